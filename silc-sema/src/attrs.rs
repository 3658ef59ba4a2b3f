//! Attribute combination checking: `final` + `override` on the same
//! member is contradictory, `required` only makes sense on constructors,
//! `unavailable` members must not be referenced (checked by a separate
//! walker-based diagnostic, see `lint::check_availability`).

use silc_ast::decl::{Attribute, DeclKind};
use silc_ast::{DeclArena, DeclId};
use silc_support::{DiagnosticEngine, Span};

use crate::errors::SemaError;

pub fn check_attribute_combinations(arena: &DeclArena<'_>, ids: &[DeclId], diagnostics: &mut DiagnosticEngine) {
    for &id in ids {
        let decl = arena.get(id);
        let name = decl.name().unwrap_or("?").to_string();

        if decl.common.attrs.has_final() && decl.common.attrs.has_override() {
            let err = SemaError::ConflictingAttributes {
                name: name.clone(),
                attr: "final".to_string(),
                other: "override".to_string(),
            };
            diagnostics.emit(err.to_diagnostic(Span::unknown()));
        }

        let has_required = decl.common.attrs.iter().any(|a| matches!(a, Attribute::Required));
        if has_required && !matches!(decl.kind, DeclKind::Constructor(_)) {
            let err = SemaError::ConflictingAttributes {
                name,
                attr: "required".to_string(),
                other: "non-initializer declaration".to_string(),
            };
            diagnostics.emit(err.to_diagnostic(Span::unknown()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::decl::{Attribute, DeclCommon, DeclContextId, VarDecl};
    use silc_ast::Decl;
    use silc_support::SourceRange;

    #[test]
    fn final_and_override_together_conflict() {
        let arena = DeclArena::new();
        let mut common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        common.attrs.push(Attribute::Final);
        common.attrs.push(Attribute::Override);
        let id = arena.alloc(Decl::new(
            common,
            DeclKind::Var(VarDecl {
                name: "x".to_string(),
                is_let: true,
                ty: None,
                initializer: None,
                accessors: vec![],
            }),
        ));
        let mut diags = DiagnosticEngine::new();
        check_attribute_combinations(&arena, &[id], &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn required_on_non_constructor_is_rejected() {
        let arena = DeclArena::new();
        let mut common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        common.attrs.push(Attribute::Required);
        let id = arena.alloc(Decl::new(
            common,
            DeclKind::Var(VarDecl {
                name: "x".to_string(),
                is_let: true,
                ty: None,
                initializer: None,
                accessors: vec![],
            }),
        ));
        let mut diags = DiagnosticEngine::new();
        check_attribute_combinations(&arena, &[id], &mut diags);
        assert_eq!(diags.error_count(), 1);
    }
}
