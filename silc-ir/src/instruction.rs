//! The closed instruction set. Every entry below corresponds to one of the
//! op-families the data model enumerates: allocation/teardown, memory
//! access, the eight reference-count mutators, the apply family, the
//! aggregate/extract/address forms, the five method-dispatch forms, the
//! two cast forms, and the terminator family.

use crate::value::{BlockId, ValueId};
use serde::{Deserialize, Serialize};
use silc_types::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastKind {
    /// Upcast along a known-safe supertype relationship; never fails.
    Upcast,
    /// Downcast or unrelated-type cast that must be checked at runtime.
    Checked,
    /// Bit-reinterpretation between layout-compatible types.
    Reinterpret,
}

/// Which definite-initialization role a `MarkUninitialized` address plays;
/// the DI pass downstream consults this to pick its diagnostic and its
/// self-delegation rules rather than treating every uninitialized local
/// the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkUninitKind {
    /// An ordinary local variable awaiting its first assignment.
    Var,
    /// `self` in a designated initializer with no superclass to delegate to.
    RootSelf,
    /// `self` in a designated initializer that must call a superclass
    /// initializer before any stored property is readable.
    DerivedSelf,
    /// `self` in a convenience initializer, which must delegate to another
    /// initializer of the same type before `self` is usable at all.
    DelegatingSelf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstKind {
    // -- allocation / teardown ------------------------------------------
    AllocStack { ty: Ty },
    AllocRef { ty: Ty },
    /// Like `AllocRef`, but the exact runtime class comes from a metatype
    /// operand rather than from `ty` alone, for allocating a value whose
    /// dynamic type is only known through a generic or existential.
    AllocRefDynamic { metatype: ValueId, ty: Ty },
    AllocBox { ty: Ty },
    /// Allocates backing storage for `count` contiguous elements of
    /// `element_ty`, producing the base address of the first element.
    AllocArray { element_ty: Ty, count: ValueId },
    DeallocStack { operand: ValueId },
    DeallocRef { operand: ValueId },
    DeallocBox { operand: ValueId },

    // -- memory access ----------------------------------------------------
    Load { address: ValueId },
    Store { value: ValueId, address: ValueId },
    /// Stores into an address that may already hold a valid value: the
    /// old value is released after the new one is stored, unlike `Store`
    /// which requires the destination to start uninitialized.
    Assign { value: ValueId, address: ValueId },
    CopyAddr { src: ValueId, dest: ValueId, take: bool, initialize: bool },
    IndexAddr { base: ValueId, index: ValueId },
    /// Marks an address as not yet holding a valid value, for the
    /// definite-initialization checker to track; forwards `operand`'s
    /// address as its own result.
    MarkUninitialized { operand: ValueId, kind: MarkUninitKind },

    // -- reference-count mutators (no results; operand is consumed by
    //    convention, not by the Rust type system) ------------------------
    StrongRetain { operand: ValueId },
    StrongRelease { operand: ValueId },
    RetainValue { operand: ValueId },
    ReleaseValue { operand: ValueId },
    UnownedRetain { operand: ValueId },
    UnownedRelease { operand: ValueId },
    AutoreleaseReturn { operand: ValueId },
    AutoreleaseValue { operand: ValueId },

    // -- apply family -----------------------------------------------------
    FunctionRef { function: String },
    BuiltinRef { name: String },
    Apply { callee: ValueId, substitutions: Vec<Ty>, args: Vec<ValueId> },
    PartialApply { callee: ValueId, substitutions: Vec<Ty>, args: Vec<ValueId> },

    // -- aggregation / extraction ------------------------------------------
    Tuple { elements: Vec<ValueId> },
    TupleExtract { operand: ValueId, index: u32 },
    TupleElementAddr { operand: ValueId, index: u32 },
    Struct { ty: Ty, fields: Vec<ValueId> },
    StructExtract { operand: ValueId, field: u32 },
    StructElementAddr { operand: ValueId, field: u32 },
    Enum { ty: Ty, case: u32, payload: Option<ValueId> },
    UncheckedEnumData { operand: ValueId, case: u32 },
    UncheckedTakeEnumDataAddr { operand: ValueId, case: u32 },

    // -- literals ----------------------------------------------------------
    IntegerLiteral { ty: Ty, value: i64 },
    FloatLiteral { ty: Ty, bits: u64 },
    StringLiteral { value: String },

    // -- method dispatch ----------------------------------------------------
    WitnessMethod { ty: Ty, member: String },
    ClassMethod { operand: ValueId, member: String },
    SuperMethod { operand: ValueId, member: String },
    DynamicMethod { operand: ValueId, member: String },
    ProtocolMethod { operand: ValueId, member: String },

    // -- casts ----------------------------------------------------------
    CheckedCast { operand: ValueId, target: Ty, kind: CastKind },
    UnconditionalCast { operand: ValueId, target: Ty, kind: CastKind },

    // -- terminators ----------------------------------------------------
    Branch { target: BlockId, args: Vec<ValueId> },
    CondBranch {
        cond: ValueId,
        then_block: BlockId,
        then_args: Vec<ValueId>,
        else_block: BlockId,
        else_args: Vec<ValueId>,
    },
    SwitchEnum { operand: ValueId, cases: Vec<(u32, BlockId)>, default: Option<BlockId> },
    SwitchEnumAddr { operand: ValueId, cases: Vec<(u32, BlockId)>, default: Option<BlockId> },
    SwitchInt { operand: ValueId, cases: Vec<(i64, BlockId)>, default: Option<BlockId> },
    DynamicMethodBranch { operand: ValueId, member: String, has_method: BlockId, no_method: BlockId },
    Return { operand: Option<ValueId> },
    Unreachable,
    CondFail { operand: ValueId, message: String },
}

impl InstKind {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstKind::Branch { .. }
                | InstKind::CondBranch { .. }
                | InstKind::SwitchEnum { .. }
                | InstKind::SwitchEnumAddr { .. }
                | InstKind::SwitchInt { .. }
                | InstKind::DynamicMethodBranch { .. }
                | InstKind::Return { .. }
                | InstKind::Unreachable
                | InstKind::CondFail { .. }
        )
    }

    /// Reference-count mutators named explicitly in the data model; used
    /// by the RC-pairing dataflow to pick out the instructions it
    /// classifies.
    pub fn is_rc_mutator(&self) -> bool {
        matches!(
            self,
            InstKind::StrongRetain { .. }
                | InstKind::StrongRelease { .. }
                | InstKind::RetainValue { .. }
                | InstKind::ReleaseValue { .. }
                | InstKind::UnownedRetain { .. }
                | InstKind::UnownedRelease { .. }
                | InstKind::AutoreleaseReturn { .. }
                | InstKind::AutoreleaseValue { .. }
        )
    }

    /// The successor blocks a terminator can transfer control to, in no
    /// particular order. Empty for `Return`/`Unreachable`/`CondFail`.
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            InstKind::Branch { target, .. } => vec![*target],
            InstKind::CondBranch { then_block, else_block, .. } => vec![*then_block, *else_block],
            InstKind::SwitchEnum { cases, default, .. }
            | InstKind::SwitchEnumAddr { cases, default, .. } => {
                let mut out: Vec<BlockId> = cases.iter().map(|(_, b)| *b).collect();
                out.extend(default.iter().copied());
                out
            }
            InstKind::SwitchInt { cases, default, .. } => {
                let mut out: Vec<BlockId> = cases.iter().map(|(_, b)| *b).collect();
                out.extend(default.iter().copied());
                out
            }
            InstKind::DynamicMethodBranch { has_method, no_method, .. } => {
                vec![*has_method, *no_method]
            }
            _ => vec![],
        }
    }

    /// Every value this instruction reads, for the verifier's
    /// dominance/use-def check and the RC dataflow's operand walk.
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            InstKind::AllocStack { .. }
            | InstKind::AllocRef { .. }
            | InstKind::AllocBox { .. }
            | InstKind::FunctionRef { .. }
            | InstKind::BuiltinRef { .. }
            | InstKind::IntegerLiteral { .. }
            | InstKind::FloatLiteral { .. }
            | InstKind::StringLiteral { .. }
            | InstKind::Unreachable => vec![],
            InstKind::DeallocStack { operand }
            | InstKind::DeallocRef { operand }
            | InstKind::DeallocBox { operand }
            | InstKind::Load { address: operand }
            | InstKind::StrongRetain { operand }
            | InstKind::StrongRelease { operand }
            | InstKind::RetainValue { operand }
            | InstKind::ReleaseValue { operand }
            | InstKind::UnownedRetain { operand }
            | InstKind::UnownedRelease { operand }
            | InstKind::AutoreleaseReturn { operand }
            | InstKind::AutoreleaseValue { operand }
            | InstKind::TupleExtract { operand, .. }
            | InstKind::TupleElementAddr { operand, .. }
            | InstKind::StructExtract { operand, .. }
            | InstKind::StructElementAddr { operand, .. }
            | InstKind::UncheckedEnumData { operand, .. }
            | InstKind::UncheckedTakeEnumDataAddr { operand, .. }
            | InstKind::ClassMethod { operand, .. }
            | InstKind::SuperMethod { operand, .. }
            | InstKind::DynamicMethod { operand, .. }
            | InstKind::ProtocolMethod { operand, .. }
            | InstKind::CheckedCast { operand, .. }
            | InstKind::UnconditionalCast { operand, .. }
            | InstKind::SwitchEnum { operand, .. }
            | InstKind::SwitchEnumAddr { operand, .. }
            | InstKind::SwitchInt { operand, .. }
            | InstKind::DynamicMethodBranch { operand, .. }
            | InstKind::MarkUninitialized { operand, .. }
            | InstKind::CondFail { operand, .. } => vec![*operand],
            InstKind::AllocRefDynamic { metatype, .. } => vec![*metatype],
            InstKind::AllocArray { count, .. } => vec![*count],
            InstKind::Store { value, address } | InstKind::Assign { value, address } => vec![*value, *address],
            InstKind::CopyAddr { src, dest, .. } => vec![*src, *dest],
            InstKind::IndexAddr { base, index } => vec![*base, *index],
            InstKind::Apply { callee, args, .. } | InstKind::PartialApply { callee, args, .. } => {
                let mut ops = vec![*callee];
                ops.extend(args.iter().copied());
                ops
            }
            InstKind::Tuple { elements } => elements.clone(),
            InstKind::Struct { fields, .. } => fields.clone(),
            InstKind::Enum { payload, .. } => payload.iter().copied().collect(),
            InstKind::WitnessMethod { .. } => vec![],
            InstKind::Branch { args, .. } => args.clone(),
            InstKind::CondBranch { cond, then_args, else_args, .. } => {
                let mut ops = vec![*cond];
                ops.extend(then_args.iter().copied());
                ops.extend(else_args.iter().copied());
                ops
            }
            InstKind::Return { operand } => operand.iter().copied().collect(),
        }
    }
}

/// One instruction plus the SSA values it produces. Most instructions
/// produce zero or one result; `Apply` of a tuple-returning callee or a
/// destructuring form may produce more, which is why this is a `Vec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstKind,
    pub results: Vec<(ValueId, Ty)>,
}

impl Instruction {
    pub fn new(kind: InstKind) -> Self {
        Self { kind, results: Vec::new() }
    }

    pub fn with_result(kind: InstKind, result: ValueId, ty: Ty) -> Self {
        Self { kind, results: vec![(result, ty)] }
    }

    pub fn is_terminator(&self) -> bool {
        self.kind.is_terminator()
    }
}
