//! Inheritance-clause cycle detection: a tri-state DFS over the nominal
//! decl graph (spec §4.2's "recursive requests during validation
//! short-circuit or fail with a precise diagnostic"), grounded on
//! `vex-compiler`'s own tri-state validation fields reused here as a
//! side-table rather than mutated in place, since `DeclArena` hands out
//! shared references only.

use silc_ast::decl::{DeclKind, NominalDecl, ValidationState};
use silc_ast::{DeclArena, DeclId};
use silc_support::{DiagnosticEngine, Span};
use std::collections::HashMap;

use crate::errors::SemaError;

/// Runs cycle detection over every nominal declaration, returning each
/// one's final validation state (`Validated` if its inheritance clause is
/// acyclic, `Invalid` if it participates in a cycle).
pub fn check_cycles(
    arena: &DeclArena<'_>,
    nominal_ids: &[DeclId],
    name_to_id: &HashMap<String, DeclId>,
    diagnostics: &mut DiagnosticEngine,
) -> HashMap<DeclId, ValidationState> {
    let mut states: HashMap<DeclId, ValidationState> = HashMap::new();
    for &id in nominal_ids {
        states.entry(id).or_insert(ValidationState::Unvalidated);
    }

    for &id in nominal_ids {
        if states[&id] == ValidationState::Unvalidated {
            let mut path = Vec::new();
            visit(arena, id, name_to_id, &mut states, &mut path, diagnostics);
        }
    }

    states
}

fn visit(
    arena: &DeclArena<'_>,
    id: DeclId,
    name_to_id: &HashMap<String, DeclId>,
    states: &mut HashMap<DeclId, ValidationState>,
    path: &mut Vec<String>,
    diagnostics: &mut DiagnosticEngine,
) {
    match states.get(&id) {
        Some(ValidationState::Validated) | Some(ValidationState::Invalid) => return,
        Some(ValidationState::BeingValidated) => {
            // Re-entrant: a cycle. Mark every decl already on the path invalid.
            let decl = arena.get(id);
            let name = decl.name().unwrap_or("?").to_string();
            let err = SemaError::InheritanceCycle(name.clone(), path.clone());
            diagnostics.emit(err.to_diagnostic(Span::unknown()));
            states.insert(id, ValidationState::Invalid);
            return;
        }
        _ => {}
    }

    states.insert(id, ValidationState::BeingValidated);

    let decl = arena.get(id);
    let nominal = match &decl.kind {
        DeclKind::Nominal(n) => n,
        _ => {
            states.insert(id, ValidationState::Validated);
            return;
        }
    };

    let name = nominal.name.clone();
    path.push(name);

    let mut cyclic = false;
    for parent_name in &nominal.inherits {
        if let Some(&parent_id) = name_to_id.get(parent_name) {
            if parent_id == id {
                cyclic = true;
                continue;
            }
            visit(arena, parent_id, name_to_id, states, path, diagnostics);
            if states.get(&parent_id) == Some(&ValidationState::Invalid) {
                cyclic = true;
            }
        }
        // Unknown parent names are a separate (name-resolution) concern.
    }

    path.pop();
    states.insert(
        id,
        if cyclic {
            ValidationState::Invalid
        } else {
            ValidationState::Validated
        },
    );
}

/// Convenience used by the orchestrator to build the `name -> DeclId` table
/// cycle detection (and override checking) both need.
pub fn index_nominal_decls(arena: &DeclArena<'_>, ids: &[DeclId]) -> HashMap<String, DeclId> {
    let mut map = HashMap::new();
    for &id in ids {
        if let DeclKind::Nominal(NominalDecl { name, .. }) = &arena.get(id).kind {
            map.insert(name.clone(), id);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::decl::{Accessibility, DeclCommon, DeclContextId, NominalKind};
    use silc_ast::Decl;
    use silc_support::SourceRange;

    fn nominal<'arena>(arena: &'arena DeclArena<'arena>, name: &str, inherits: Vec<&str>) -> DeclId {
        let common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        arena.alloc(Decl::new(
            common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: name.to_string(),
                type_params: vec![],
                inherits: inherits.into_iter().map(String::from).collect(),
                members: vec![],
            }),
        ))
    }

    #[test]
    fn acyclic_chain_validates_cleanly() {
        let arena = DeclArena::new();
        let a = nominal(&arena, "A", vec![]);
        let b = nominal(&arena, "B", vec!["A"]);
        let c = nominal(&arena, "C", vec!["B"]);
        let ids = vec![a, b, c];
        let name_to_id = index_nominal_decls(&arena, &ids);
        let mut diags = DiagnosticEngine::new();
        let states = check_cycles(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(diags.error_count(), 0);
        assert!(states.values().all(|s| *s == ValidationState::Validated));
    }

    #[test]
    fn direct_cycle_is_diagnosed() {
        let arena = DeclArena::new();
        let a = nominal(&arena, "A", vec!["B"]);
        let b = nominal(&arena, "B", vec!["A"]);
        let ids = vec![a, b];
        let name_to_id = index_nominal_decls(&arena, &ids);
        let mut diags = DiagnosticEngine::new();
        let states = check_cycles(&arena, &ids, &name_to_id, &mut diags);
        assert!(diags.error_count() >= 1);
        assert!(states.values().any(|s| *s == ValidationState::Invalid));
    }

    #[test]
    fn accessibility_at_least_respects_ordering() {
        assert!(Accessibility::Public.at_least(Accessibility::Internal));
        assert!(!Accessibility::Private.at_least(Accessibility::Public));
    }
}
