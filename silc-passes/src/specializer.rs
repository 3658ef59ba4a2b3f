//! Generic specialization, grounded on
//! `original_source/lib/SILPasses/Utils/Generics.cpp`'s two-phase shape:
//! collect every `apply`/`partial_apply` site that calls a generic
//! function with concrete substitutions (bottom-up, callee functions are
//! cloned before the call sites that reference them are rewritten), then
//! drain a worklist that clones each requested specialization once,
//! scanning the clone's own body for further generic call sites so
//! specialization propagates top-down through the new clone. Two
//! requests that resolve to the same mangled name share one clone.

use silc_ir::{InstKind, Module, Substitutions};
use silc_types::{Ty, TypeInterner};
use std::collections::{HashMap, HashSet, VecDeque};

/// Builds the deterministic mangled name for a specialization: the base
/// function name followed by each substituted type's display form, in
/// generic-parameter order, so two requests for the same (callee,
/// substitution) pair always mangle identically.
pub fn mangle(base: &str, generic_params: &[silc_ir::GenericParam], subst: &HashMap<(u32, u32), Ty>) -> String {
    let mut name = base.to_string();
    let mut ordered: Vec<_> = generic_params.iter().collect();
    ordered.sort_by_key(|p| (p.depth, p.index));
    for param in ordered {
        if let Some(ty) = subst.get(&(param.depth, param.index)) {
            name.push('_');
            name.push_str(&ty.to_string());
        }
    }
    name
}

struct RewriteSite {
    function: String,
    block: usize,
    instruction: usize,
    mangled: String,
}

/// Runs specialization to a fixed point, returning the number of new
/// specialized clones added to the module.
pub fn specialize_module(module: &mut Module, interner: &TypeInterner) -> usize {
    let generic_params: HashMap<String, Vec<silc_ir::GenericParam>> = module
        .functions()
        .filter(|f| !f.generic_params.is_empty())
        .map(|f| (f.name.clone(), f.generic_params.clone()))
        .collect();

    let mut worklist: VecDeque<(String, HashMap<(u32, u32), Ty>)> = VecDeque::new();
    let mut rewrite_sites = Vec::new();
    collect_sites(module, &generic_params, &mut worklist, &mut rewrite_sites);

    let mut materialized: HashSet<String> = HashSet::new();
    let mut created = 0usize;

    while let Some((callee, subst_map)) = worklist.pop_front() {
        let Some(params) = generic_params.get(&callee) else { continue };
        let mangled = mangle(&callee, params, &subst_map);
        if materialized.contains(&mangled) || module.lookup_function(&mangled).is_some() {
            materialized.insert(mangled);
            continue;
        }
        let Some(source) = module.lookup_function(&callee).cloned() else { continue };
        let subst = Substitutions { interner, map: subst_map };
        let mut clone = silc_ir::clone_specialized(&source, &subst, mangled.clone());
        clone.generic_params.clear();
        clone.linkage = silc_ir::Linkage::Shared;

        collect_sites_in_function(&clone, &generic_params, &mut worklist, &mut rewrite_sites);

        module.add_function(clone).expect("mangled specialization name deduplicated against materialized above");
        materialized.insert(mangled);
        created += 1;
    }

    apply_rewrites(module, &rewrite_sites);
    created
}

/// Finds every `Apply`/`PartialApply` site across the module whose
/// callee is a `FunctionRef` to a generic function with a fully concrete
/// substitution list, recording both a specialization request and the
/// instruction site to rewrite once the clone exists.
fn collect_sites(
    module: &Module,
    generic_params: &HashMap<String, Vec<silc_ir::GenericParam>>,
    worklist: &mut VecDeque<(String, HashMap<(u32, u32), Ty>)>,
    sites: &mut Vec<RewriteSite>,
) {
    for function in module.functions() {
        collect_sites_in_function(function, generic_params, worklist, sites);
    }
}

fn collect_sites_in_function(
    function: &silc_ir::Function,
    generic_params: &HashMap<String, Vec<silc_ir::GenericParam>>,
    worklist: &mut VecDeque<(String, HashMap<(u32, u32), Ty>)>,
    sites: &mut Vec<RewriteSite>,
) {
    for (block_idx, block) in function.blocks.iter().enumerate() {
        let mut function_refs: HashMap<silc_ir::ValueId, &str> = HashMap::new();
        for inst in &block.instructions {
            if let InstKind::FunctionRef { function: name } = &inst.kind {
                if let Some((value, _)) = inst.results.first() {
                    function_refs.insert(*value, name.as_str());
                }
            }
        }
        for (inst_idx, inst) in block.instructions.iter().enumerate() {
            let (callee, substitutions) = match &inst.kind {
                InstKind::Apply { callee, substitutions, .. } => (*callee, substitutions),
                InstKind::PartialApply { callee, substitutions, .. } => (*callee, substitutions),
                _ => continue,
            };
            let Some(&callee_name) = function_refs.get(&callee) else { continue };
            let Some(params) = generic_params.get(callee_name) else { continue };
            if substitutions.is_empty() || substitutions.len() != params.len() {
                continue;
            }
            let mut ordered: Vec<_> = params.iter().collect();
            ordered.sort_by_key(|p| (p.depth, p.index));
            let subst_map: HashMap<(u32, u32), Ty> = ordered
                .iter()
                .zip(substitutions.iter())
                .map(|(p, ty)| ((p.depth, p.index), ty.clone()))
                .collect();
            let mangled = mangle(callee_name, params, &subst_map);
            worklist.push_back((callee_name.to_string(), subst_map));
            sites.push(RewriteSite {
                function: function.name.clone(),
                block: block_idx,
                instruction: inst_idx,
                mangled,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ir::{BasicBlock, Builder, Function, GenericParam, Linkage};

    fn build_identity(interner: &TypeInterner) -> Function {
        let archetype = interner.archetype("T", 0, 0);
        let fn_ty = interner.function(vec![archetype.clone()], archetype.clone(), false);
        let mut f = Function::new("identity", fn_ty, Linkage::Shared);
        f.generic_params.push(GenericParam { name: "T".to_string(), depth: 0, index: 0 });
        let entry = f.fresh_block();
        f.blocks.push(BasicBlock::new(entry));
        let arg;
        {
            let mut builder = Builder::at(&mut f, entry);
            arg = builder.add_block_arg(entry, archetype.clone());
            builder.emit_terminator(InstKind::Return { operand: Some(arg) }).unwrap();
        }
        f
    }

    fn build_caller(interner: &TypeInterner) -> Function {
        let void_ty = interner.void();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], void_ty.clone(), false);
        let mut caller = Function::new("caller", fn_ty, Linkage::Hidden);
        let entry = caller.fresh_block();
        caller.blocks.push(BasicBlock::new(entry));
        {
            let mut builder = Builder::at(&mut caller, entry);
            let callee = builder
                .emit_with_result(InstKind::FunctionRef { function: "identity".to_string() }, int_ty.clone())
                .unwrap();
            let one = builder
                .emit_with_result(InstKind::IntegerLiteral { ty: int_ty.clone(), value: 1 }, int_ty.clone())
                .unwrap();
            builder
                .emit_with_result(
                    InstKind::Apply { callee, substitutions: vec![int_ty.clone()], args: vec![one] },
                    int_ty,
                )
                .unwrap();
            builder.emit_terminator(InstKind::Unreachable).unwrap();
        }
        caller
    }

    #[test]
    fn a_concrete_apply_site_produces_one_monomorphic_clone() {
        let interner = TypeInterner::new();
        let mut module = Module::new();
        module.add_function(build_identity(&interner)).unwrap();
        module.add_function(build_caller(&interner)).unwrap();

        let created = specialize_module(&mut module, &interner);
        assert_eq!(created, 1);
        assert!(module.lookup_function("identity_Int").is_some());

        let caller = module.lookup_function("caller").unwrap();
        let calls_specialized = caller.blocks[0].instructions.iter().any(|i| {
            matches!(&i.kind, InstKind::FunctionRef { function } if function == "identity_Int")
        });
        assert!(calls_specialized);
    }

    #[test]
    fn two_identical_requests_share_one_clone() {
        let interner = TypeInterner::new();
        let mut module = Module::new();
        module.add_function(build_identity(&interner)).unwrap();
        module.add_function(build_caller(&interner)).unwrap();
        module.add_function({
            let mut second = build_caller(&interner);
            second.name = "caller2".to_string();
            second
        }).unwrap();

        let created = specialize_module(&mut module, &interner);
        assert_eq!(created, 1);
    }
}

/// Redirects each recorded call site's `FunctionRef` to the mangled
/// specialization and clears the `Apply`/`PartialApply`'s substitution
/// list, since the clone is already fully concrete.
fn apply_rewrites(module: &mut Module, sites: &[RewriteSite]) {
    for site in sites {
        let Some(function) = module.lookup_function_mut(&site.function) else { continue };
        let Some(block) = function.blocks.get_mut(site.block) else { continue };

        let callee_value = match block.instructions.get(site.instruction).map(|i| &i.kind) {
            Some(InstKind::Apply { callee, .. }) | Some(InstKind::PartialApply { callee, .. }) => *callee,
            _ => continue,
        };
        if let Some(inst) = block.instructions.get_mut(site.instruction) {
            match &mut inst.kind {
                InstKind::Apply { substitutions, .. } | InstKind::PartialApply { substitutions, .. } => {
                    substitutions.clear();
                }
                _ => {}
            }
        }
        for producer in &mut block.instructions {
            if let InstKind::FunctionRef { function: name } = &mut producer.kind {
                if producer.results.first().map(|(v, _)| *v) == Some(callee_value) {
                    *name = site.mangled.clone();
                }
            }
        }
    }
}
