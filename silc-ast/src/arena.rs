//! Arena allocation for the declaration graph (spec §3.5: "AST nodes are
//! arena-allocated for the compilation unit"). Grounded on
//! `vex-ast::arena::AstArena<'ast>`: a lifetime-parameterized wrapper
//! around `typed_arena::Arena` that hands out references tied to the
//! arena's own borrow instead of raw pointers plus `unsafe` dereferencing.
//!
//! `Decl`s are appended to a `typed_arena::Arena` and referenced elsewhere
//! by [`DeclId`] (a stable index, per [`DeclId`]'s own doc comment — not a
//! pointer), so cross-references (override target, member list, extended-
//! type decl) stay valid independent of how the arena itself is borrowed.
//! The stable-index lookup table lives inside the arena as a
//! `RefCell<Vec<&'arena Decl>>`: pushing into it only ever copies out a
//! `&'arena Decl` (a `Copy` value), so no reference ever outlives the
//! `RefCell` borrow that produced it and no `unsafe` is needed.

use crate::decl::{Decl, DeclId};
use std::cell::RefCell;
use typed_arena::Arena;

/// Owns every [`Decl`] produced while lowering one compilation unit.
///
/// `'arena` is the lifetime of a `&'arena DeclArena` borrow long enough to
/// cover every `alloc` call a caller makes; callers that only read via
/// [`DeclArena::get`] don't need to name it (an anonymous `DeclArena<'_>`
/// works, since `get` doesn't require the long-lived receiver).
pub struct DeclArena<'arena> {
    decls: Arena<Decl>,
    index: RefCell<Vec<&'arena Decl>>,
}

impl<'arena> DeclArena<'arena> {
    pub fn new() -> Self {
        Self {
            decls: Arena::new(),
            index: RefCell::new(Vec::new()),
        }
    }

    /// Allocate a declaration, returning its stable id. Requires a borrow
    /// that lasts for the whole `'arena` region so the returned reference
    /// can be kept in the index without `unsafe`.
    pub fn alloc(&'arena self, decl: Decl) -> DeclId {
        let reference: &'arena Decl = self.decls.alloc(decl);
        let mut index = self.index.borrow_mut();
        let id = DeclId(index.len() as u32);
        index.push(reference);
        id
    }

    /// Resolve a `DeclId` back to its node. Panics if `id` was never
    /// allocated by this arena — a logic error in the caller, not a
    /// user-facing condition, so this mirrors the teacher's own
    /// `TypeInterner`/arena accessors, which assume well-formed indices.
    pub fn get(&self, id: DeclId) -> &Decl {
        self.index.borrow()[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.index.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DeclArena<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{Accessibility, DeclCommon, DeclContextId, DeclKind, NominalDecl, NominalKind};
    use silc_support::SourceRange;

    #[test]
    fn alloc_and_get_round_trips() {
        let arena = DeclArena::new();
        let common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let id = arena.alloc(Decl::new(
            common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Struct,
                name: "Point".to_string(),
                type_params: vec![],
                inherits: vec![],
                members: vec![],
            }),
        ));
        assert_eq!(arena.get(id).name(), Some("Point"));
        assert_eq!(arena.get(id).common.accessibility, Accessibility::Internal);
    }

    #[test]
    fn ids_are_stable_across_further_allocation() {
        let arena = DeclArena::new();
        let common = || DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let first = arena.alloc(Decl::new(
            common(),
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Enum,
                name: "First".into(),
                type_params: vec![],
                inherits: vec![],
                members: vec![],
            }),
        ));
        for i in 0..64 {
            arena.alloc(Decl::new(
                common(),
                DeclKind::Nominal(NominalDecl {
                    kind: NominalKind::Struct,
                    name: format!("S{i}"),
                    type_params: vec![],
                    inherits: vec![],
                    members: vec![],
                }),
            ));
        }
        assert_eq!(arena.get(first).name(), Some("First"));
    }
}
