//! Implicit constructor synthesis: a struct with no explicit initializer
//! gets a synthesized memberwise one, plus a no-argument default one if
//! every stored property already has a default; a class without an
//! explicit designated initializer chains every unintroduced designated
//! initializer up its ancestor chain (a stub invoking `fatalError` once
//! the subclass has its own custom initializer instead); a `required`
//! initializer anywhere up that chain must be overridden explicitly, and
//! a missing override is diagnosed with a Fix-It containing the full
//! declaration the author needs to add.

use silc_ast::decl::{ConstructorDecl, DeclKind, NominalDecl, NominalKind, VarDecl};
use silc_ast::{Block, DeclArena, DeclId, Expression, Param, Statement, Type};
use silc_support::{DiagnosticEngine, Span};
use std::collections::{HashMap, HashSet};

use crate::errors::SemaError;

/// A constructor synthesized for a nominal type that declared none.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedConstructor {
    pub owner: DeclId,
    pub decl: ConstructorDecl,
}

/// Synthesizes memberwise/default initializers for structs and chained/
/// stub initializers for classes, and checks that every `required`
/// initializer inherited anywhere up the ancestor chain is satisfied.
pub fn synthesize_constructors(
    arena: &DeclArena<'_>,
    nominal_ids: &[DeclId],
    name_to_id: &HashMap<String, DeclId>,
    diagnostics: &mut DiagnosticEngine,
) -> Vec<SynthesizedConstructor> {
    let mut synthesized = Vec::new();

    for &id in nominal_ids {
        let decl = arena.get(id);
        let nominal = match &decl.kind {
            DeclKind::Nominal(n) => n,
            _ => continue,
        };

        let has_explicit_ctor = nominal
            .members
            .iter()
            .any(|m| matches!(arena.get(*m).kind, DeclKind::Constructor(_)));

        match nominal.kind {
            NominalKind::Struct if !has_explicit_ctor => {
                if let Some(ctor) = memberwise_initializer(arena, nominal) {
                    synthesized.push(SynthesizedConstructor { owner: id, decl: ctor });
                }
                if let Some(ctor) = default_initializer(arena, nominal) {
                    synthesized.push(SynthesizedConstructor { owner: id, decl: ctor });
                }
            }
            NominalKind::Class => {
                synthesized.extend(synthesize_class_initializers(
                    arena,
                    id,
                    nominal,
                    name_to_id,
                    has_explicit_ctor,
                    diagnostics,
                ));
            }
            _ => {}
        }
    }

    synthesized
}

fn memberwise_initializer(arena: &DeclArena<'_>, nominal: &NominalDecl) -> Option<ConstructorDecl> {
    let mut params = Vec::new();
    for &member_id in &nominal.members {
        if let DeclKind::Var(VarDecl {
            name,
            ty: Some(ty),
            initializer: None,
            ..
        }) = &arena.get(member_id).kind
        {
            params.push(Param {
                name: name.clone(),
                ty: ty.clone(),
            });
        }
    }
    Some(ConstructorDecl {
        params,
        is_failable: false,
        is_designated: true,
        body: Block { statements: vec![] },
    })
}

/// A zero-argument initializer, synthesized alongside the memberwise one
/// when every stored property already has an initial value.
fn default_initializer(arena: &DeclArena<'_>, nominal: &NominalDecl) -> Option<ConstructorDecl> {
    let stored_vars = nominal.members.iter().filter_map(|&m| match &arena.get(m).kind {
        DeclKind::Var(v) => Some(v),
        _ => None,
    });
    let all_defaulted = stored_vars
        .map(|v| v.initializer.is_some())
        .fold(true, |acc, defaulted| acc && defaulted);
    if !all_defaulted {
        return None;
    }
    Some(ConstructorDecl {
        params: vec![],
        is_failable: false,
        is_designated: true,
        body: Block { statements: vec![] },
    })
}

/// A designated initializer found somewhere up a class's ancestor chain,
/// together with the id of the ancestor that declares it and whether it
/// carries `required`.
struct InheritedCtor {
    ancestor: DeclId,
    required: bool,
    decl: ConstructorDecl,
}

/// Walks `nominal`'s single-inheritance chain (first listed superclass at
/// each level), collecting every designated initializer visible from any
/// ancestor. A visited set guards against the cycle case, which
/// inheritance-cycle detection already diagnoses separately.
fn ancestor_designated_ctors(arena: &DeclArena<'_>, nominal: &NominalDecl, name_to_id: &HashMap<String, DeclId>) -> Vec<InheritedCtor> {
    let mut out = Vec::new();
    let mut visited = HashSet::new();
    let mut current = nominal.inherits.first().cloned();

    while let Some(name) = current {
        let Some(&id) = name_to_id.get(&name) else { break };
        if !visited.insert(id) {
            break;
        }
        let ancestor = match &arena.get(id).kind {
            DeclKind::Nominal(n) => n,
            _ => break,
        };
        for &m in &ancestor.members {
            let member = arena.get(m);
            if let DeclKind::Constructor(c) = &member.kind {
                if c.is_designated {
                    out.push(InheritedCtor {
                        ancestor: id,
                        required: member.common.attrs.has_required(),
                        decl: c.clone(),
                    });
                }
            }
        }
        current = ancestor.inherits.first().cloned();
    }

    out
}

/// Parameter names in order, used to tell whether a subclass has already
/// introduced an override for a given ancestor initializer's signature.
fn param_key(params: &[Param]) -> Vec<String> {
    params.iter().map(|p| p.name.clone()).collect()
}

fn synthesize_class_initializers(
    arena: &DeclArena<'_>,
    class_id: DeclId,
    nominal: &NominalDecl,
    name_to_id: &HashMap<String, DeclId>,
    has_explicit_ctor: bool,
    diagnostics: &mut DiagnosticEngine,
) -> Vec<SynthesizedConstructor> {
    let mut out = Vec::new();

    let mut introduced: HashSet<Vec<String>> = nominal
        .members
        .iter()
        .filter_map(|&m| match &arena.get(m).kind {
            DeclKind::Constructor(c) => Some(param_key(&c.params)),
            _ => None,
        })
        .collect();

    for inherited in ancestor_designated_ctors(arena, nominal, name_to_id) {
        let key = param_key(&inherited.decl.params);
        if introduced.contains(&key) {
            continue;
        }

        if inherited.required {
            let class_name = arena.get(class_id).name().unwrap_or("?").to_string();
            let err = SemaError::RequiredInitializerMissing {
                class: class_name,
                name: "init".to_string(),
                fix_it: required_initializer_fix_it(&inherited.decl),
            };
            diagnostics.emit(err.to_diagnostic(Span::unknown()));
        } else if !has_explicit_ctor {
            out.push(SynthesizedConstructor {
                owner: class_id,
                decl: ConstructorDecl {
                    params: inherited.decl.params.clone(),
                    is_failable: inherited.decl.is_failable,
                    is_designated: true,
                    body: Block { statements: vec![] },
                },
            });
        } else {
            out.push(SynthesizedConstructor {
                owner: class_id,
                decl: ConstructorDecl {
                    params: inherited.decl.params.clone(),
                    is_failable: inherited.decl.is_failable,
                    is_designated: true,
                    body: Block {
                        statements: vec![fatal_error_call()],
                    },
                },
            });
        }

        introduced.insert(key);
        let _ = inherited.ancestor;
    }

    out
}

fn fatal_error_call() -> Statement {
    Statement::Expression(Expression::Call {
        span_id: None,
        func: Box::new(Expression::Ident("fatalError".to_string())),
        type_args: vec![],
        args: vec![Expression::StringLiteral("not implemented".to_string())],
    })
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::I8 => "I8".to_string(),
        Type::I16 => "I16".to_string(),
        Type::I32 => "I32".to_string(),
        Type::I64 => "I64".to_string(),
        Type::I128 => "I128".to_string(),
        Type::U8 => "U8".to_string(),
        Type::U16 => "U16".to_string(),
        Type::U32 => "U32".to_string(),
        Type::U64 => "U64".to_string(),
        Type::U128 => "U128".to_string(),
        Type::F32 => "F32".to_string(),
        Type::F64 => "F64".to_string(),
        Type::F128 => "F128".to_string(),
        Type::Bool => "Bool".to_string(),
        Type::String => "String".to_string(),
        Type::Byte => "Byte".to_string(),
        Type::Nil => "Nil".to_string(),
        Type::Error => "Error".to_string(),
        Type::Named(name) => name.clone(),
        _ => "_".to_string(),
    }
}

/// The Fix-It insertion text for a missing required initializer: the
/// declaration the subclass needs, `required init(...)`, with a body that
/// invokes `fatalError` until the author fills it in for real.
fn required_initializer_fix_it(ctor: &ConstructorDecl) -> String {
    let params = ctor
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, type_name(&p.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("required init({params}) {{\n    fatalError(\"not implemented\")\n}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::decl::{Attribute, DeclCommon, DeclContextId, NominalKind};
    use silc_ast::Decl;

    fn struct_with_fields<'arena>(arena: &'arena DeclArena<'arena>, name: &str, field_names: &[&str]) -> DeclId {
        let members: Vec<DeclId> = field_names
            .iter()
            .map(|fname| {
                let common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
                arena.alloc(Decl::new(
                    common,
                    DeclKind::Var(VarDecl {
                        name: fname.to_string(),
                        is_let: true,
                        ty: Some(Type::Named("Int".to_string())),
                        initializer: None,
                        accessors: vec![],
                    }),
                ))
            })
            .collect();
        let common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        arena.alloc(Decl::new(
            common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Struct,
                name: name.to_string(),
                type_params: vec![],
                inherits: vec![],
                members,
            }),
        ))
    }

    #[test]
    fn memberwise_initializer_has_one_param_per_field() {
        let arena = DeclArena::new();
        let point = struct_with_fields(&arena, "Point", &["x", "y"]);
        let ids = vec![point];
        let name_to_id = HashMap::new();
        let mut diags = DiagnosticEngine::new();
        let synthesized = synthesize_constructors(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(synthesized.len(), 1);
        assert_eq!(synthesized[0].decl.params.len(), 2);
    }

    #[test]
    fn fully_defaulted_struct_also_gets_a_default_initializer() {
        let arena = DeclArena::new();
        let common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let field = arena.alloc(Decl::new(
            common,
            DeclKind::Var(VarDecl {
                name: "count".to_string(),
                is_let: false,
                ty: Some(Type::Named("Int".to_string())),
                initializer: Some(Expression::IntLiteral(0)),
                accessors: vec![],
            }),
        ));
        let nominal_common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let counter = arena.alloc(Decl::new(
            nominal_common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Struct,
                name: "Counter".to_string(),
                type_params: vec![],
                inherits: vec![],
                members: vec![field],
            }),
        ));

        let ids = vec![counter];
        let name_to_id = HashMap::new();
        let mut diags = DiagnosticEngine::new();
        let synthesized = synthesize_constructors(&arena, &ids, &name_to_id, &mut diags);
        // Memberwise init excludes already-initialized fields (0 params),
        // plus the zero-argument default initializer: two entries.
        assert_eq!(synthesized.len(), 2);
        assert!(synthesized.iter().all(|s| s.decl.params.is_empty()));
    }

    #[test]
    fn missing_required_initializer_is_diagnosed_with_a_fix_it() {
        let arena = DeclArena::new();
        let mut required_common =
            DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        required_common.attrs.push(Attribute::Required);
        let required_ctor = arena.alloc(Decl::new(
            required_common,
            DeclKind::Constructor(ConstructorDecl {
                params: vec![Param {
                    name: "x".to_string(),
                    ty: Type::Named("Int".to_string()),
                }],
                is_failable: false,
                is_designated: true,
                body: Block { statements: vec![] },
            }),
        ));
        let base_common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let base = arena.alloc(Decl::new(
            base_common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: "Base".to_string(),
                type_params: vec![],
                inherits: vec![],
                members: vec![required_ctor],
            }),
        ));
        let sub_common = DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL);
        let sub = arena.alloc(Decl::new(
            sub_common,
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: "Sub".to_string(),
                type_params: vec![],
                inherits: vec!["Base".to_string()],
                members: vec![],
            }),
        ));

        let ids = vec![base, sub];
        let mut name_to_id = HashMap::new();
        name_to_id.insert("Base".to_string(), base);
        name_to_id.insert("Sub".to_string(), sub);

        let mut diags = DiagnosticEngine::new();
        synthesize_constructors(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(diags.error_count(), 1);
        let diag = &diags.diagnostics()[0];
        let suggestion = diag.suggestion.as_ref().expect("missing required initializer should carry a Fix-It");
        assert!(suggestion.replacement.contains("required init(x: Int)"));
        assert!(suggestion.replacement.contains("fatalError"));
    }

    #[test]
    fn subclass_without_its_own_initializer_gets_a_chaining_override() {
        let arena = DeclArena::new();
        let base_ctor = arena.alloc(Decl::new(
            DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL),
            DeclKind::Constructor(ConstructorDecl {
                params: vec![Param {
                    name: "x".to_string(),
                    ty: Type::Named("Int".to_string()),
                }],
                is_failable: false,
                is_designated: true,
                body: Block { statements: vec![] },
            }),
        ));
        let base = arena.alloc(Decl::new(
            DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL),
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: "Base".to_string(),
                type_params: vec![],
                inherits: vec![],
                members: vec![base_ctor],
            }),
        ));
        let sub = arena.alloc(Decl::new(
            DeclCommon::new(silc_support::SourceRange::unknown(), DeclContextId::TOP_LEVEL),
            DeclKind::Nominal(NominalDecl {
                kind: NominalKind::Class,
                name: "Sub".to_string(),
                type_params: vec![],
                inherits: vec!["Base".to_string()],
                members: vec![],
            }),
        ));

        let ids = vec![base, sub];
        let mut name_to_id = HashMap::new();
        name_to_id.insert("Base".to_string(), base);
        name_to_id.insert("Sub".to_string(), sub);

        let mut diags = DiagnosticEngine::new();
        let synthesized = synthesize_constructors(&arena, &ids, &name_to_id, &mut diags);
        assert_eq!(diags.error_count(), 0);
        let sub_ctors: Vec<_> = synthesized.iter().filter(|s| s.owner == sub).collect();
        assert_eq!(sub_ctors.len(), 1);
        assert!(sub_ctors[0].decl.body.statements.is_empty());
    }
}
