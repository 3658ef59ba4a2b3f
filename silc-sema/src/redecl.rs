//! Redeclaration checking: two declarations with the same name in the
//! same [`DeclContextId`] conflict, unless they're overloaded functions
//! (distinguished by a signature key of name, parameter labels, and
//! static/instance kind) or one is a `private` discriminator-qualified
//! duplicate permitted by the `private_discriminators` option (mirrors
//! `vex-compiler`'s `borrow_checker::orchestrator` "register globals,
//! then check" shape: a first pass indexes every name, a second pass
//! reports conflicts).

use silc_ast::decl::{Decl, DeclKind};
use silc_ast::{DeclArena, DeclId};
use silc_support::{DiagnosticEngine, Span};
use std::collections::HashMap;

use crate::errors::SemaError;

/// When `true`, two `private` declarations of the same name in the same
/// context are permitted (each is only visible within its own file, so a
/// real implementation would further key by file id; this option exists
/// so callers that don't track per-file identity can still opt out of
/// treating same-named privates as conflicts).
#[derive(Debug, Clone, Copy, Default)]
pub struct RedeclOptions {
    pub private_discriminators: bool,
}

fn is_overloadable(kind: &DeclKind) -> bool {
    matches!(kind, DeclKind::Func(_))
}

/// A function's overload-distinguishing signature: its name, its
/// parameter labels in order, and whether it's static (no receiver) or an
/// instance method. Two functions with equal keys are the same
/// declaration repeated, not an overload.
type SignatureKey = (String, Vec<String>, bool);

fn signature_key(decl: &Decl) -> Option<SignatureKey> {
    match &decl.kind {
        DeclKind::Func(f) => Some((
            f.name.clone(),
            f.params.iter().map(|p| p.name.clone()).collect(),
            f.receiver.is_none(),
        )),
        _ => None,
    }
}

pub fn check_redeclarations(
    arena: &DeclArena<'_>,
    all_ids: &[DeclId],
    options: RedeclOptions,
    diagnostics: &mut DiagnosticEngine,
) {
    let mut by_context_name: HashMap<(u32, String), Vec<DeclId>> = HashMap::new();
    for &id in all_ids {
        let decl = arena.get(id);
        let Some(name) = decl.name() else { continue };
        by_context_name
            .entry((decl.common.context.0, name.to_string()))
            .or_default()
            .push(id);
    }

    for ((_, name), ids) in by_context_name {
        if ids.len() < 2 {
            continue;
        }
        let all_functions = ids.iter().all(|id| is_overloadable(&arena.get(*id).kind));
        if all_functions {
            let keys: Vec<SignatureKey> = ids
                .iter()
                .map(|id| signature_key(arena.get(*id)).expect("all_functions checked DeclKind::Func above"))
                .collect();
            let all_distinct = keys
                .iter()
                .enumerate()
                .all(|(i, key)| keys[i + 1..].iter().all(|other| other != key));
            if all_distinct {
                continue;
            }
        }
        if options.private_discriminators
            && ids
                .iter()
                .all(|id| arena.get(*id).common.accessibility == silc_ast::decl::Accessibility::Private)
        {
            continue;
        }

        let mut sorted = ids.clone();
        sorted.sort_by_key(|id| id.0);
        let first = sorted[0];
        for &dup in &sorted[1..] {
            let err = SemaError::InvalidRedeclaration {
                name: name.clone(),
                previous: first,
            };
            diagnostics.emit(err.to_diagnostic(Span::unknown()));
            let _ = dup;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::decl::{DeclCommon, DeclContextId, NominalDecl, NominalKind};
    use silc_ast::{Decl, Function, Param, Type};
    use silc_support::SourceRange;

    fn function<'arena>(arena: &'arena DeclArena<'arena>, name: &str, params: Vec<&str>) -> DeclId {
        let common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        arena.alloc(Decl::new(
            common,
            DeclKind::Func(Function {
                is_async: false,
                is_gpu: false,
                is_mutable: false,
                receiver: None,
                name: name.to_string(),
                type_params: vec![],
                where_clause: vec![],
                params: params
                    .into_iter()
                    .map(|p| Param { name: p.to_string(), ty: Type::Named("Int".to_string()) })
                    .collect(),
                return_type: None,
                body: silc_ast::Block { statements: vec![] },
                is_variadic: false,
                variadic_type: None,
            }),
        ))
    }

    fn nominal<'arena>(arena: &'arena DeclArena<'arena>, name: &str) -> DeclId {
        let common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        arena.alloc(Decl::new(
            common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Struct,
                name: name.to_string(),
                type_params: vec![],
                inherits: vec![],
                members: vec![],
            }),
        ))
    }

    #[test]
    fn duplicate_struct_names_conflict() {
        let arena = DeclArena::new();
        nominal(&arena, "Point");
        nominal(&arena, "Point");
        let ids: Vec<DeclId> = (0..arena.len() as u32).map(DeclId).collect();
        let mut diags = DiagnosticEngine::new();
        check_redeclarations(&arena, &ids, RedeclOptions::default(), &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn unique_names_do_not_conflict() {
        let arena = DeclArena::new();
        nominal(&arena, "Point");
        nominal(&arena, "Line");
        let ids: Vec<DeclId> = (0..arena.len() as u32).map(DeclId).collect();
        let mut diags = DiagnosticEngine::new();
        check_redeclarations(&arena, &ids, RedeclOptions::default(), &mut diags);
        assert_eq!(diags.error_count(), 0);
    }

    #[test]
    fn identical_signature_functions_are_redeclarations() {
        let arena = DeclArena::new();
        function(&arena, "f", vec!["x"]);
        function(&arena, "f", vec!["x"]);
        let ids: Vec<DeclId> = (0..arena.len() as u32).map(DeclId).collect();
        let mut diags = DiagnosticEngine::new();
        check_redeclarations(&arena, &ids, RedeclOptions::default(), &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn functions_with_different_parameter_labels_are_overloads() {
        let arena = DeclArena::new();
        function(&arena, "f", vec!["x"]);
        function(&arena, "f", vec!["y"]);
        let ids: Vec<DeclId> = (0..arena.len() as u32).map(DeclId).collect();
        let mut diags = DiagnosticEngine::new();
        check_redeclarations(&arena, &ids, RedeclOptions::default(), &mut diags);
        assert_eq!(diags.error_count(), 0);
    }
}
