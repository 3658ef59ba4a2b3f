//! Incremental verifier: runs after every pass (the pass manager calls
//! it when a pass reports it changed a function) and checks the
//! universal invariants rather than re-deriving types from scratch.

use crate::errors::{IrError, IrResult};
use crate::function::Function;
use crate::value::ValueId;
use std::collections::{HashMap, HashSet};

/// Checks that every block ends in exactly one terminator and that every
/// operand is dominated by its definition — a block argument or an
/// earlier instruction in a block that dominates the use.
pub fn verify_function(function: &Function) -> IrResult<()> {
    check_single_terminator(function)?;
    check_successors_exist(function)?;
    check_dominance(function)?;
    check_block_arg_counts(function)?;
    Ok(())
}

fn check_single_terminator(function: &Function) -> IrResult<()> {
    for block in &function.blocks {
        let terminator_count = block.instructions.iter().filter(|i| i.is_terminator()).count();
        if terminator_count == 0 {
            return Err(IrError::MissingTerminator(function.name.clone(), block.id));
        }
        if terminator_count > 1 {
            return Err(IrError::MultipleTerminators(function.name.clone(), block.id));
        }
        let last_is_terminator = block.instructions.last().map(|i| i.is_terminator()).unwrap_or(false);
        if !last_is_terminator {
            return Err(IrError::MultipleTerminators(function.name.clone(), block.id));
        }
    }
    Ok(())
}

fn check_successors_exist(function: &Function) -> IrResult<()> {
    for block in &function.blocks {
        if let Some(term) = block.terminator() {
            for succ in term.kind.successors() {
                if function.block(succ).is_none() {
                    return Err(IrError::UnknownSuccessor {
                        function: function.name.clone(),
                        block: block.id,
                        target: succ,
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_block_arg_counts(function: &Function) -> IrResult<()> {
    for block in &function.blocks {
        let Some(term) = block.terminator() else { continue };
        let checks: Vec<_> = match &term.kind {
            crate::instruction::InstKind::Branch { target, args } => vec![(*target, args.len())],
            crate::instruction::InstKind::CondBranch { then_block, then_args, else_block, else_args, .. } => {
                vec![(*then_block, then_args.len()), (*else_block, else_args.len())]
            }
            _ => vec![],
        };
        for (target, given) in checks {
            let expected = function.block(target).map(|b| b.args.len()).unwrap_or(0);
            if given != expected {
                return Err(IrError::BlockArgCountMismatch {
                    function: function.name.clone(),
                    target,
                    given,
                    expected,
                });
            }
        }
    }
    Ok(())
}

/// A simplified, conservative dominance check suitable for an
/// incremental verifier: for a straight-line (reducible, mostly-forward)
/// function this confirms every use's definition precedes it in
/// visitation order. Block arguments are treated as defined at block
/// entry, which dominates everything in that block.
fn check_dominance(function: &Function) -> IrResult<()> {
    let mut defined: HashSet<ValueId> = HashSet::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let index_of: HashMap<_, _> = function.blocks.iter().enumerate().map(|(i, b)| (b.id, i)).collect();

    if function.blocks.is_empty() {
        return Ok(());
    }

    let mut stack = vec![0usize];
    while let Some(idx) = stack.pop() {
        if !visited.insert(idx) {
            continue;
        }
        let block = &function.blocks[idx];
        for (v, _) in &block.args {
            defined.insert(*v);
        }
        for inst in &block.instructions {
            for operand in inst.kind.operands() {
                if !defined.contains(&operand) {
                    return Err(IrError::UseBeforeDef { function: function.name.clone(), value: operand });
                }
            }
            for (v, _) in &inst.results {
                defined.insert(*v);
            }
        }
        if let Some(term) = block.terminator() {
            for succ in term.kind.successors() {
                if let Some(&succ_idx) = index_of.get(&succ) {
                    stack.push(succ_idx);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::function::{BasicBlock, Linkage};
    use crate::instruction::InstKind;
    use silc_types::TypeInterner;

    #[test]
    fn a_block_with_no_terminator_is_rejected() {
        let interner = TypeInterner::new();
        let fn_ty = interner.function(vec![], interner.void(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));

        let result = verify_function(&function);
        assert!(matches!(result, Err(IrError::MissingTerminator(_, _))));
    }

    #[test]
    fn a_well_formed_function_verifies() {
        let interner = TypeInterner::new();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], int_ty.clone(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));
        {
            let mut builder = Builder::at(&mut function, entry);
            let v = builder
                .emit_with_result(InstKind::IntegerLiteral { ty: int_ty.clone(), value: 1 }, int_ty)
                .unwrap();
            builder.emit_terminator(InstKind::Return { operand: Some(v) }).unwrap();
        }

        assert!(verify_function(&function).is_ok());
    }

    #[test]
    fn branching_with_the_wrong_argument_count_is_rejected() {
        let interner = TypeInterner::new();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], int_ty.clone(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));
        let target = function.fresh_block();
        function.blocks.push(BasicBlock::new(target));
        {
            let mut builder = Builder::at(&mut function, target);
            builder.add_block_arg(target, int_ty.clone());
            builder.emit_terminator(InstKind::Unreachable).unwrap();
        }
        {
            let mut builder = Builder::at(&mut function, entry);
            builder.emit_terminator(InstKind::Branch { target, args: vec![] }).unwrap();
        }

        let result = verify_function(&function);
        assert!(matches!(result, Err(IrError::BlockArgCountMismatch { .. })));
    }
}
