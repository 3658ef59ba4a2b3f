//! Override resolution: an `override`-attributed member must name a
//! member of exactly one superclass, agree on settability (a `let`
//! property cannot be overridden into something settable), and must not
//! target a `final` member.

use silc_ast::decl::{Accessibility, DeclKind, NominalDecl, VarDecl};
use silc_ast::{DeclArena, DeclId};
use silc_support::{DiagnosticEngine, Span};
use std::collections::HashMap;

use crate::errors::SemaError;

/// Checks every member of every class against the member of the same name
/// in its (single, first-listed) superclass, if any.
pub fn check_overrides(
    arena: &DeclArena<'_>,
    nominal_ids: &[DeclId],
    name_to_id: &HashMap<String, DeclId>,
    diagnostics: &mut DiagnosticEngine,
) {
    for &id in nominal_ids {
        let decl = arena.get(id);
        let NominalDecl {
            inherits, members, ..
        } = match &decl.kind {
            DeclKind::Nominal(n) => n,
            _ => continue,
        };

        let Some(super_name) = inherits.first() else {
            continue;
        };
        let Some(&super_id) = name_to_id.get(super_name) else {
            continue;
        };
        let super_members = match &arena.get(super_id).kind {
            DeclKind::Nominal(n) => &n.members,
            _ => continue,
        };

        let mut super_by_name: HashMap<&str, DeclId> = HashMap::new();
        for &m in super_members {
            if let Some(name) = arena.get(m).name() {
                super_by_name.insert(name, m);
            }
        }

        for &member_id in members {
            let member = arena.get(member_id);
            let name = member.name().unwrap_or("").to_string();
            let has_override = member.common.attrs.has_override();

            match super_by_name.get(name.as_str()) {
                Some(&base_id) => {
                    let base = arena.get(base_id);
                    if !has_override {
                        // Shadowing without `override` is allowed for new
                        // members but not for same-signature re-declaration;
                        // redeclaration-within-scope is redecl.rs's job.
                        continue;
                    }
                    if base.common.attrs.has_final() {
                        let err = SemaError::OverrideOfFinal { name: name.clone() };
                        diagnostics.emit(err.to_diagnostic(Span::unknown()));
                    }
                    let base_is_let = matches!(&base.kind, DeclKind::Var(VarDecl { is_let: true, .. }));
                    let sub_is_var = matches!(&member.kind, DeclKind::Var(VarDecl { is_let: false, .. }));
                    if base_is_let && sub_is_var {
                        let err = SemaError::OverrideLetProperty { name: name.clone() };
                        diagnostics.emit(err.to_diagnostic(Span::unknown()));
                    }
                    check_accessibility_widening(&name, member, base, diagnostics);
                }
                None => {
                    if has_override {
                        let err = SemaError::OverrideMismatch { name: name.clone() };
                        diagnostics.emit(err.to_diagnostic(Span::unknown()));
                    }
                }
            }
        }
    }
}

fn check_accessibility_widening(
    name: &str,
    member: &silc_ast::decl::Decl,
    base: &silc_ast::decl::Decl,
    diagnostics: &mut DiagnosticEngine,
) {
    // An override may not be *less* accessible than what it overrides.
    if member.common.accessibility < base.common.accessibility
        && base.common.accessibility != Accessibility::Private
    {
        let err = SemaError::AccessibilityViolation {
            name: name.to_string(),
            ty: format!("{:?}", base.common.accessibility),
        };
        diagnostics.emit(err.to_diagnostic(Span::unknown()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::decl::{Attribute, DeclCommon, DeclContextId, NominalKind};
    use silc_ast::Decl;
    use silc_support::SourceRange;
    use std::collections::HashMap;

    fn var<'arena>(arena: &'arena DeclArena<'arena>, name: &str, is_let: bool, overridden: bool, accessibility: Accessibility) -> DeclId {
        let mut common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        common.accessibility = accessibility;
        if overridden {
            common.attrs.push(Attribute::Override);
        }
        arena.alloc(Decl::new(
            common,
            DeclKind::Var(VarDecl {
                name: name.to_string(),
                is_let,
                ty: None,
                initializer: None,
                accessors: vec![],
            }),
        ))
    }

    fn class<'arena>(arena: &'arena DeclArena<'arena>, name: &str, inherits: Vec<&str>, members: Vec<DeclId>) -> DeclId {
        let common = DeclCommon::new(SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        arena.alloc(Decl::new(
            common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: name.to_string(),
                type_params: vec![],
                inherits: inherits.into_iter().map(String::from).collect(),
                members,
            }),
        ))
    }

    #[test]
    fn overriding_let_with_var_is_rejected() {
        let arena = DeclArena::new();
        let base_prop = var(&arena, "x", true, false, Accessibility::Internal);
        let base = class(&arena, "Base", vec![], vec![base_prop]);
        let sub_prop = var(&arena, "x", false, true, Accessibility::Internal);
        let sub = class(&arena, "Sub", vec!["Base"], vec![sub_prop]);

        let ids = vec![base, sub];
        let mut name_to_id = HashMap::new();
        name_to_id.insert("Base".to_string(), base);
        name_to_id.insert("Sub".to_string(), sub);

        let mut diags = DiagnosticEngine::new();
        check_overrides(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn override_with_no_matching_base_member_is_rejected() {
        let arena = DeclArena::new();
        let base = class(&arena, "Base", vec![], vec![]);
        let sub_prop = var(&arena, "y", true, true, Accessibility::Internal);
        let sub = class(&arena, "Sub", vec!["Base"], vec![sub_prop]);

        let ids = vec![base, sub];
        let mut name_to_id = HashMap::new();
        name_to_id.insert("Base".to_string(), base);
        name_to_id.insert("Sub".to_string(), sub);

        let mut diags = DiagnosticEngine::new();
        check_overrides(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(diags.error_count(), 1);
    }
}
