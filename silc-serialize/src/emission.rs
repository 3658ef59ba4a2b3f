//! Which functions get a serialized body versus a declaration-only
//! record, grounded on the emission rules `original_source/lib/Serialization/SerializeSIL.cpp`
//! applies: transparent functions always carry a body (so an importing
//! module can inline through them), shared functions carry one only if
//! something in this module actually calls them, `SerializeAll` carries
//! every body regardless, and a function with module-private linkage
//! never gets a body in the default policy since nothing outside this
//! module could legally reference it anyway.

use silc_ir::{InstKind, Linkage, Module};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPolicy {
    Default,
    SerializeAll,
}

fn referenced_function_names(module: &Module) -> HashSet<String> {
    let mut names = HashSet::new();
    for function in module.functions() {
        for block in &function.blocks {
            for inst in &block.instructions {
                if let InstKind::FunctionRef { function } = &inst.kind {
                    names.insert(function.clone());
                }
            }
        }
    }
    names
}

/// Decides, per function, whether its body should be written.
pub fn plan_emission(module: &Module, policy: EmissionPolicy) -> std::collections::HashMap<String, bool> {
    let referenced = referenced_function_names(module);
    let mut plan = std::collections::HashMap::new();
    for function in module.functions() {
        let include_body = match policy {
            EmissionPolicy::SerializeAll => true,
            EmissionPolicy::Default => match function.linkage {
                Linkage::Private => false,
                Linkage::Shared => function.flags.transparent || referenced.contains(&function.name),
                _ => function.flags.transparent || function.linkage.is_visible_externally(),
            },
        };
        plan.insert(function.name.clone(), include_body);
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ir::Function;
    use silc_types::TypeInterner;

    #[test]
    fn private_functions_never_get_a_body_under_the_default_policy() {
        let interner = TypeInterner::new();
        let mut module = Module::new();
        module
            .add_function(Function::new("secret", interner.function(vec![], interner.void(), false), Linkage::Private))
            .unwrap();
        let plan = plan_emission(&module, EmissionPolicy::Default);
        assert_eq!(plan.get("secret"), Some(&false));
    }

    #[test]
    fn serialize_all_always_includes_every_body() {
        let interner = TypeInterner::new();
        let mut module = Module::new();
        module
            .add_function(Function::new("secret", interner.function(vec![], interner.void(), false), Linkage::Private))
            .unwrap();
        let plan = plan_emission(&module, EmissionPolicy::SerializeAll);
        assert_eq!(plan.get("secret"), Some(&true));
    }
}
