//! Command-line entry point. Exercises the front end end to end
//! (`check`) and hand-builds small IR modules to drive the pass
//! manager, specializer, RC dataflow, and container format
//! (`ir-demo`, `serialize-demo`) rather than reimplementing a full
//! compile-to-executable pipeline.

use clap::{Parser as ClapParser, Subcommand};
use silc_ir::{BasicBlock, Builder, Function, InstKind, Linkage, Module};
use silc_passes::{specialize_module, FunctionTransform, PassManager, RcDataflowOptions};
use silc_serialize::EmissionPolicy;
use silc_types::TypeInterner;
use std::fs;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "silc", version, about = "A small SIL-inspired compiler front end and IR toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and semantically analyze a source file, printing diagnostics.
    Check { file: PathBuf },
    /// Build a small generic-function IR module, run the pass manager
    /// and generic specializer over it, and print the result.
    IrDemo,
    /// Build a tiny module, serialize it to the container format, read
    /// it back lazily, and report what was recovered.
    SerializeDemo,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => cmd_check(&file),
        Commands::IrDemo => cmd_ir_demo(),
        Commands::SerializeDemo => cmd_serialize_demo(),
    }
}

fn cmd_check(path: &PathBuf) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)?;
    let mut parser = silc_parser::Parser::new(&source).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let file = parser.parse_file().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let mut analyzer = silc_sema::Analyzer::new();
    let result = analyzer.analyze_file(&file);

    result.diagnostics.print_all(&source);
    if result.has_errors() {
        log::error!("{} error(s) found in {}", result.diagnostics.error_count(), path.display());
        std::process::exit(1);
    }
    println!(
        "{}: no errors ({} top-level declaration(s))",
        path.display(),
        result.nominal_ids.len() + result.function_decls.len()
    );
    Ok(())
}

/// Builds `identity<T>(x: T) -> T` plus two call sites applying it at
/// `Int` and `Bool`, then runs the pass manager (with a no-op function
/// pass standing in for a real transform) followed by the specializer,
/// printing how many monomorphic clones it produced.
fn cmd_ir_demo() -> anyhow::Result<()> {
    let interner = TypeInterner::new();
    let mut module = Module::new();

    let archetype = interner.archetype("T", 0, 0);
    let identity_ty = interner.function(vec![archetype.clone()], archetype.clone(), false);
    let mut identity = Function::new("identity", identity_ty, Linkage::Shared);
    identity
        .generic_params
        .push(silc_ir::GenericParam { name: "T".to_string(), depth: 0, index: 0 });
    let entry = identity.fresh_block();
    identity.blocks.push(BasicBlock::new(entry));
    {
        let mut builder = Builder::at(&mut identity, entry);
        let arg = builder.add_block_arg(entry, archetype.clone());
        builder.emit_terminator(InstKind::Return { operand: Some(arg) })?;
    }
    module.add_function(identity)?;

    for (name, ty, literal) in [("call_int", interner.int(), 1i64), ("call_bool", interner.bool_(), 1i64)] {
        let fn_ty = interner.function(vec![], interner.void(), false);
        let mut caller = Function::new(name, fn_ty, Linkage::Hidden);
        let entry = caller.fresh_block();
        caller.blocks.push(BasicBlock::new(entry));
        {
            let mut builder = Builder::at(&mut caller, entry);
            let callee_ty = interner.function(vec![ty.clone()], ty.clone(), false);
            let callee =
                builder.emit_with_result(InstKind::FunctionRef { function: "identity".to_string() }, callee_ty)?;
            let value = builder.emit_with_result(
                InstKind::IntegerLiteral { ty: ty.clone(), value: literal },
                ty.clone(),
            )?;
            builder.emit_with_result(
                InstKind::Apply { callee, substitutions: vec![ty], args: vec![value] },
                interner.void(),
            )?;
            builder.emit_terminator(InstKind::Unreachable)?;
        }
        module.add_function(caller)?;
    }

    let mut manager = PassManager::new();
    manager.add_function_pass(NoopTransform);
    let stats = manager.run(&mut module);
    println!(
        "pass manager: {} function pass(es), {} module pass(es) run",
        stats.function_passes_run, stats.module_passes_run
    );

    let created = specialize_module(&mut module, &interner);
    println!("specializer produced {created} monomorphic clone(s):");
    for function in module.functions() {
        if function.generic_params.is_empty() && function.name.starts_with("identity_") {
            println!("  {}", function.name);
        }
    }

    for function in module.functions() {
        if let Err(err) = silc_ir::verify_function(function) {
            println!("  verification note for {}: {err}", function.name);
        }
    }

    let first = module.functions().next().expect("at least one function was just added");
    let pairs = silc_passes::find_pairs(first, RcDataflowOptions::default());
    println!("rc pairing found {} pair(s) in the first function", pairs.len());

    Ok(())
}

struct NoopTransform;
impl FunctionTransform for NoopTransform {
    fn name(&self) -> &str {
        "noop"
    }
    fn run(&self, _function: &mut Function) -> bool {
        false
    }
}

fn cmd_serialize_demo() -> anyhow::Result<()> {
    let interner = TypeInterner::new();
    let mut module = Module::new();
    let fn_ty = interner.function(vec![], interner.void(), false);

    let mut pub_fn = Function::new("greet", fn_ty.clone(), Linkage::Public);
    let entry = pub_fn.fresh_block();
    pub_fn.blocks.push(BasicBlock::new(entry));
    {
        let mut builder = Builder::at(&mut pub_fn, entry);
        builder.emit_terminator(InstKind::Return { operand: None })?;
    }
    module.add_function(pub_fn)?;
    module.add_function(Function::new("helper", fn_ty, Linkage::Private))?;

    let bytes = silc_serialize::write_module(&module, EmissionPolicy::Default)?;
    println!("serialized module to {} byte(s)", bytes.len());

    let lazy = silc_serialize::LazyModule::read(&bytes)?;
    for name in lazy.function_names() {
        let function = lazy.get_function(name)?;
        println!("  {name}: linkage={:?} declaration={}", function.linkage, function.is_declaration());
    }
    Ok(())
}
