//! [`Function`] and [`BasicBlock`], and the [`Linkage`] state machine
//! that governs how a function's definition is shared across modules
//! during serialization and generic specialization.

use crate::instruction::Instruction;
use crate::value::{BlockId, ValueId};
use serde::{Deserialize, Serialize};
use silc_types::Ty;

/// Mirrors the linkage lattice the data model specifies: externally
/// visible definitions demote to "external" declarations once another
/// module has taken ownership of emitting the body; the demotion is
/// idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Linkage {
    Public,
    PublicExternal,
    Hidden,
    HiddenExternal,
    Shared,
    Private,
}

impl Linkage {
    /// Applies the "another module now owns the definition" transition.
    /// `Shared` stays `Shared` (it's already the "one canonical owner,
    /// many references" case); every other linkage moves to its
    /// `*External` counterpart, and that move is idempotent.
    pub fn make_external(self) -> Linkage {
        match self {
            Linkage::Public | Linkage::PublicExternal => Linkage::PublicExternal,
            Linkage::Hidden | Linkage::HiddenExternal => Linkage::HiddenExternal,
            Linkage::Shared => Linkage::Shared,
            Linkage::Private => Linkage::Private,
        }
    }

    /// Whether this linkage denotes a declaration without a local body
    /// (the function must be found in, and its body supplied by, some
    /// other module at link time).
    pub fn is_external(self) -> bool {
        matches!(self, Linkage::PublicExternal | Linkage::HiddenExternal)
    }

    /// Whether the body is visible outside the defining module at all.
    pub fn is_visible_externally(self) -> bool {
        matches!(self, Linkage::Public | Linkage::PublicExternal | Linkage::Shared)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionFlags {
    /// Transparent functions are always safe for the optimizer to inline
    /// or specialize through, even across module boundaries.
    pub transparent: bool,
    /// Bare functions skip the ownership-convention prologue/epilogue
    /// (no implicit retain of `self`, no implicit release on return).
    pub bare: bool,
    /// Thunks exist purely to adapt one calling convention to another.
    pub thunk: bool,
    /// Fragile functions must be serialized with a body even under
    /// `serialize all` emission restrictions tighter than normal.
    pub fragile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub args: Vec<(ValueId, Ty)>,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self { id, args: Vec::new(), instructions: Vec::new() }
    }

    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.is_terminator())
    }

    pub fn has_terminator(&self) -> bool {
        self.terminator().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    pub depth: u32,
    pub index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub ty: Ty,
    pub linkage: Linkage,
    pub flags: FunctionFlags,
    pub generic_params: Vec<GenericParam>,
    pub blocks: Vec<BasicBlock>,
    next_value: u32,
    next_block: u32,
}

impl Function {
    pub fn new(name: impl Into<String>, ty: Ty, linkage: Linkage) -> Self {
        Self {
            name: name.into(),
            ty,
            linkage,
            flags: FunctionFlags::default(),
            generic_params: Vec::new(),
            blocks: Vec::new(),
            next_value: 0,
            next_block: 0,
        }
    }

    /// Functions with no blocks are declarations: a reference to a body
    /// defined elsewhere, matching `Linkage::is_external`.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn fresh_value(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    pub fn fresh_block(&mut self) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        id
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }
}
