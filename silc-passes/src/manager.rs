//! Pass scheduling, grounded on `original_source/lib/SILPasses/PassManager.cpp`'s
//! mixed function-pass/module-pass pipeline: function passes queue up as
//! "pending" and are flushed (run to a per-function fixed point) the
//! moment a module pass needs to see their effect, or at the end of the
//! pipeline. A global pass-count cap bounds total work and takes strict
//! precedence over the "this function reached a fixed point" bookkeeping
//! — a function stopped mid-sweep by the cap is never marked complete,
//! even if its last round happened to produce no change.

use silc_ir::{Function, Module};
use std::collections::HashSet;

/// One pass invocation's contribution to a function: did it change
/// anything the verifier or a later pass might care about.
pub trait FunctionTransform {
    fn name(&self) -> &str;
    fn run(&self, function: &mut Function) -> bool;
}

/// A module-wide pass: runs once per pipeline position, sees (and may
/// add, remove, or rewrite) every function in the module.
pub trait ModuleTransform {
    fn name(&self) -> &str;
    fn run(&self, module: &mut Module) -> bool;
}

enum Pass {
    Function(Box<dyn FunctionTransform>),
    Module(Box<dyn ModuleTransform>),
}

#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub function_passes_run: usize,
    pub module_passes_run: usize,
    pub changed: bool,
    pub capped: bool,
}

/// Tracks which functions have reached a fixed point under the pending
/// function-pass queue without the run being cut short by the pass-count
/// cap. Queried by passes (the specializer in particular) that want to
/// skip functions known to be stable.
#[derive(Debug, Default)]
pub struct CompleteFunctions {
    complete: HashSet<String>,
}

impl CompleteFunctions {
    pub fn is_complete(&self, name: &str) -> bool {
        self.complete.contains(name)
    }

    fn mark(&mut self, name: &str) {
        self.complete.insert(name.to_string());
    }

    fn invalidate(&mut self, name: &str) {
        self.complete.remove(name);
    }
}

pub struct PassManager {
    passes: Vec<Pass>,
    max_iterations: usize,
    max_pass_count: usize,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new(), max_iterations: 20, max_pass_count: usize::MAX }
    }

    /// Caps the total number of individual pass invocations (function or
    /// module) across the whole run, independent of the per-function
    /// iteration cap.
    pub fn with_max_pass_count(mut self, cap: usize) -> Self {
        self.max_pass_count = cap;
        self
    }

    pub fn add_function_pass(&mut self, pass: impl FunctionTransform + 'static) {
        self.passes.push(Pass::Function(Box::new(pass)));
    }

    pub fn add_module_pass(&mut self, pass: impl ModuleTransform + 'static) {
        self.passes.push(Pass::Module(Box::new(pass)));
    }

    pub fn run(&self, module: &mut Module) -> RunStats {
        let mut pending: Vec<&dyn FunctionTransform> = Vec::new();
        let mut pass_count = 0usize;
        let mut complete = CompleteFunctions::default();
        let mut stats = RunStats::default();

        for pass in &self.passes {
            match pass {
                Pass::Function(fp) => pending.push(fp.as_ref()),
                Pass::Module(mp) => {
                    self.flush(&pending, module, &mut pass_count, &mut complete, &mut stats);
                    pending.clear();
                    if pass_count >= self.max_pass_count {
                        stats.capped = true;
                        return stats;
                    }
                    let changed = mp.run(module);
                    pass_count += 1;
                    stats.module_passes_run += 1;
                    stats.changed |= changed;
                    if changed {
                        for function in module.functions() {
                            complete.invalidate(&function.name);
                        }
                    }
                    if pass_count >= self.max_pass_count {
                        stats.capped = true;
                        return stats;
                    }
                }
            }
        }
        self.flush(&pending, module, &mut pass_count, &mut complete, &mut stats);
        stats
    }

    /// Runs every pending function pass against every non-declaration
    /// function, looping each function to a local fixed point (no pass
    /// in the pending set reported a change) or until `max_iterations`
    /// rounds. A function is marked complete only if it reaches that
    /// fixed point without the global pass-count cap interrupting it
    /// first — the cap always wins over the completeness bookkeeping.
    fn flush(
        &self,
        pending: &[&dyn FunctionTransform],
        module: &mut Module,
        pass_count: &mut usize,
        complete: &mut CompleteFunctions,
        stats: &mut RunStats,
    ) {
        if pending.is_empty() {
            return;
        }
        for function in module.functions_mut() {
            if function.is_declaration() || complete.is_complete(&function.name) {
                continue;
            }
            let mut iterations = 0usize;
            let mut reached_fixed_point = false;
            'outer: loop {
                let mut changed_this_round = false;
                for pass in pending {
                    if *pass_count >= self.max_pass_count {
                        stats.capped = true;
                        break 'outer;
                    }
                    let changed = pass.run(function);
                    *pass_count += 1;
                    stats.function_passes_run += 1;
                    if changed {
                        changed_this_round = true;
                        stats.changed = true;
                    }
                }
                iterations += 1;
                if !changed_this_round {
                    reached_fixed_point = true;
                    break;
                }
                if iterations >= self.max_iterations {
                    break;
                }
            }
            if reached_fixed_point && *pass_count < self.max_pass_count {
                complete.mark(&function.name);
            }
        }
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ir::{BasicBlock, InstKind, Linkage};
    use silc_types::TypeInterner;
    use std::cell::Cell;

    struct CountingPass {
        calls: Cell<usize>,
        changes_remaining: Cell<usize>,
    }

    impl FunctionTransform for CountingPass {
        fn name(&self) -> &str {
            "counting"
        }

        fn run(&self, _function: &mut Function) -> bool {
            self.calls.set(self.calls.get() + 1);
            let remaining = self.changes_remaining.get();
            if remaining > 0 {
                self.changes_remaining.set(remaining - 1);
                true
            } else {
                false
            }
        }
    }

    fn trivial_function(name: &str) -> Function {
        let interner = TypeInterner::new();
        let mut f = Function::new(name, interner.function(vec![], interner.void(), false), Linkage::Hidden);
        let entry = f.fresh_block();
        let mut block = BasicBlock::new(entry);
        block.instructions.push(silc_ir::Instruction::new(InstKind::Return { operand: None }));
        f.blocks.push(block);
        f
    }

    #[test]
    fn a_function_pass_runs_until_it_stops_reporting_changes() {
        let mut module = Module::new();
        module.add_function(trivial_function("f")).unwrap();

        let pass = CountingPass { calls: Cell::new(0), changes_remaining: Cell::new(3) };
        let mut manager = PassManager::new();
        manager.add_function_pass(pass);
        let stats = manager.run(&mut module);

        assert!(!stats.capped);
        assert!(stats.function_passes_run >= 4);
    }

    #[test]
    fn the_pass_count_cap_stops_the_run_even_mid_fixed_point_search() {
        let mut module = Module::new();
        module.add_function(trivial_function("f")).unwrap();

        let pass = CountingPass { calls: Cell::new(0), changes_remaining: Cell::new(1000) };
        let mut manager = PassManager::new().with_max_pass_count(5);
        manager.add_function_pass(pass);
        let stats = manager.run(&mut module);

        assert!(stats.capped);
        assert_eq!(stats.function_passes_run, 5);
    }
}
