//! Semantic analysis: lowers a parsed `File` into a bookkept [`Decl`]
//! graph and runs the checks named in the data model — inheritance-cycle
//! detection, override resolution, redeclaration checking, attribute
//! validation, implicit constructor synthesis, and three walker-based
//! lints — in the phase-sequenced shape of `vex-compiler`'s
//! `borrow_checker::orchestrator::BorrowChecker`.

pub mod attrs;
pub mod ctors;
pub mod errors;
pub mod inheritance;
pub mod lint;
pub mod overrides;
pub mod redecl;

pub use errors::{SemaError, SemaResult};
pub use redecl::RedeclOptions;

use silc_ast::decl::{Accessibility, DeclCommon, DeclContextId, DeclKind, NominalDecl};
use silc_ast::{Decl, DeclArena, DeclId, Function, Item};
use silc_support::DiagnosticEngine;
use std::collections::HashMap;

/// Everything produced by one run of [`Analyzer::analyze_file`]. The
/// `DeclArena` built while lowering lives only for the duration of that
/// call — every phase that needs it runs inside `analyze_file`, so the
/// result carries the decls' extracted findings, not the arena itself.
pub struct AnalysisResult {
    pub nominal_ids: Vec<DeclId>,
    pub function_decls: Vec<(DeclId, Function)>,
    pub synthesized_constructors: Vec<ctors::SynthesizedConstructor>,
    pub diagnostics: DiagnosticEngine,
}

impl AnalysisResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerOptions {
    pub redecl: RedeclOptions,
}

/// Orchestrates the phases in the order `vex-compiler`'s
/// `BorrowChecker::check_program` runs its own: register global symbols
/// first (so later phases can resolve forward references), then run each
/// phase over the full symbol table.
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn analyze_file(&mut self, file: &silc_ast::File) -> AnalysisResult {
        let arena = DeclArena::new();
        let mut diagnostics = DiagnosticEngine::new();

        let mut nominal_ids = Vec::new();
        let mut function_decls = Vec::new();
        let mut all_ids = Vec::new();

        for item in &file.items {
            lower_item(item, &arena, &mut nominal_ids, &mut function_decls, &mut all_ids);
        }

        let name_to_id = inheritance::index_nominal_decls(&arena, &nominal_ids);

        let _states = inheritance::check_cycles(&arena, &nominal_ids, &name_to_id, &mut diagnostics);
        overrides::check_overrides(&arena, &nominal_ids, &name_to_id, &mut diagnostics);
        redecl::check_redeclarations(&arena, &all_ids, self.options.redecl, &mut diagnostics);
        attrs::check_attribute_combinations(&arena, &all_ids, &mut diagnostics);
        let synthesized_constructors =
            ctors::synthesize_constructors(&arena, &nominal_ids, &name_to_id, &mut diagnostics);

        let unavailable = collect_unavailable(&arena, &all_ids);
        for (_, func) in &function_decls {
            lint::check_self_assign(func, &mut diagnostics);
            lint::check_unreachable_after_return(func, &mut diagnostics);
            lint::check_availability(func, &unavailable, &mut diagnostics);
        }

        AnalysisResult {
            nominal_ids,
            function_decls,
            synthesized_constructors,
            diagnostics,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_unavailable(arena: &DeclArena<'_>, ids: &[DeclId]) -> HashMap<String, Option<String>> {
    let mut map = HashMap::new();
    for &id in ids {
        let decl = arena.get(id);
        if let Some(name) = decl.name() {
            if let Some(message) = decl.common.attrs.unavailable_message() {
                map.insert(name.to_string(), message.map(str::to_string));
            }
        }
    }
    map
}

fn lower_item<'arena>(
    item: &Item,
    arena: &'arena DeclArena<'arena>,
    nominal_ids: &mut Vec<DeclId>,
    function_decls: &mut Vec<(DeclId, Function)>,
    all_ids: &mut Vec<DeclId>,
) {
    let common = |acc: Accessibility| {
        let mut c = DeclCommon::new(
            silc_support::SourceRange::unknown(),
            DeclContextId::TOP_LEVEL,
        );
        c.accessibility = acc;
        c
    };

    match item {
        Item::Function(func) => {
            let id = arena.alloc(Decl::new(common(Accessibility::Internal), DeclKind::Func(func.clone())));
            function_decls.push((id, func.clone()));
            all_ids.push(id);
        }
        Item::Struct(s) => {
            let id = arena.alloc(Decl::new(
                common(Accessibility::Internal),
                DeclKind::Nominal(NominalDecl {
                    kind: silc_ast::decl::NominalKind::Struct,
                    name: s.name.clone(),
                    type_params: s.type_params.clone(),
                    inherits: s.impl_traits.clone(),
                    members: vec![],
                }),
            ));
            nominal_ids.push(id);
            all_ids.push(id);
        }
        Item::Enum(e) => {
            let id = arena.alloc(Decl::new(
                common(Accessibility::Internal),
                DeclKind::Nominal(NominalDecl {
                    kind: silc_ast::decl::NominalKind::Enum,
                    name: e.name.clone(),
                    type_params: e.type_params.clone(),
                    inherits: vec![],
                    members: vec![],
                }),
            ));
            nominal_ids.push(id);
            all_ids.push(id);
        }
        Item::Const(c) => {
            let id = arena.alloc(Decl::new(
                common(Accessibility::Internal),
                DeclKind::Var(silc_ast::decl::VarDecl {
                    name: c.name.clone(),
                    is_let: true,
                    ty: c.ty.clone(),
                    initializer: Some(c.value.clone()),
                    accessors: vec![],
                }),
            ));
            all_ids.push(id);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ast::{File, Function, Import};

    fn empty_file() -> File {
        File {
            imports: Vec::<Import>::new(),
            items: vec![],
        }
    }

    #[test]
    fn analyzing_an_empty_file_has_no_diagnostics() {
        let mut analyzer = Analyzer::new();
        let result = analyzer.analyze_file(&empty_file());
        assert!(!result.has_errors());
    }

    fn function(name: &str, params: Vec<&str>) -> Function {
        Function {
            is_async: false,
            is_gpu: false,
            is_mutable: false,
            receiver: None,
            name: name.to_string(),
            type_params: vec![],
            where_clause: vec![],
            params: params
                .into_iter()
                .map(|p| silc_ast::Param { name: p.to_string(), ty: silc_ast::Type::Named("Int".to_string()) })
                .collect(),
            return_type: None,
            body: silc_ast::Block { statements: vec![] },
            is_variadic: false,
            variadic_type: None,
        }
    }

    #[test]
    fn identical_signature_top_level_functions_are_redeclarations() {
        let func = function("f", vec!["x"]);
        let mut file = empty_file();
        file.items.push(Item::Function(func.clone()));
        file.items.push(Item::Function(func));

        let mut analyzer = Analyzer::new();
        let result = analyzer.analyze_file(&file);
        assert!(result.has_errors());
    }

    #[test]
    fn functions_with_different_parameter_labels_are_overloads_not_redeclarations() {
        let mut file = empty_file();
        file.items.push(Item::Function(function("f", vec!["x"])));
        file.items.push(Item::Function(function("f", vec!["y"])));

        let mut analyzer = Analyzer::new();
        let result = analyzer.analyze_file(&file);
        assert!(!result.has_errors());
    }
}
