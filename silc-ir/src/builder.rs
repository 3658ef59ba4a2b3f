//! A cursor-style builder that appends instructions to one block at a
//! time and enforces the invariants a hand-assembled function must
//! satisfy before the verifier ever sees it: no instruction after a
//! terminator, and every operand must already have been produced in the
//! same function (by an earlier instruction or a block argument).

use crate::errors::{IrError, IrResult};
use crate::function::{BasicBlock, Function};
use crate::instruction::{InstKind, Instruction};
use crate::value::{BlockId, ValueId};
use silc_types::Ty;
use std::collections::HashSet;

pub struct Builder<'f> {
    function: &'f mut Function,
    current_block: BlockId,
    defined: HashSet<ValueId>,
}

impl<'f> Builder<'f> {
    /// Starts building at `block`, seeding the defined-values set from
    /// every value already produced in the function so appending to a
    /// block that isn't the first one still sees prior blocks' results.
    pub fn at(function: &'f mut Function, block: BlockId) -> Self {
        let mut defined = HashSet::new();
        for b in &function.blocks {
            for (v, _) in &b.args {
                defined.insert(*v);
            }
            for inst in &b.instructions {
                for (v, _) in &inst.results {
                    defined.insert(*v);
                }
            }
        }
        Self { function, current_block: block, defined }
    }

    pub fn create_block(&mut self) -> BlockId {
        let id = self.function.fresh_block();
        self.function.blocks.push(BasicBlock::new(id));
        id
    }

    pub fn add_block_arg(&mut self, block: BlockId, ty: Ty) -> ValueId {
        let value = self.function.fresh_value();
        if let Some(b) = self.function.block_mut(block) {
            b.args.push((value, ty));
        }
        self.defined.insert(value);
        value
    }

    pub fn switch_to_block(&mut self, block: BlockId) {
        self.current_block = block;
    }

    fn check_operands(&self, kind: &InstKind) -> IrResult<()> {
        for operand in kind.operands() {
            if !self.defined.contains(&operand) {
                return Err(IrError::UseBeforeDef { function: self.function.name.clone(), value: operand });
            }
        }
        Ok(())
    }

    fn current_block_mut(&mut self) -> &mut BasicBlock {
        let id = self.current_block;
        self.function.block_mut(id).expect("builder's current block must exist")
    }

    /// Appends a non-value-producing instruction (RC mutators, stores,
    /// dealloc forms).
    pub fn emit(&mut self, kind: InstKind) -> IrResult<()> {
        if self.current_block_mut().has_terminator() {
            return Err(IrError::MultipleTerminators(self.function.name.clone(), self.current_block));
        }
        self.check_operands(&kind)?;
        self.current_block_mut().instructions.push(Instruction::new(kind));
        Ok(())
    }

    /// Appends an instruction that produces one SSA result of type `ty`,
    /// returning the fresh value id.
    pub fn emit_with_result(&mut self, kind: InstKind, ty: Ty) -> IrResult<ValueId> {
        if self.current_block_mut().has_terminator() {
            return Err(IrError::MultipleTerminators(self.function.name.clone(), self.current_block));
        }
        self.check_operands(&kind)?;
        let value = self.function.fresh_value();
        self.current_block_mut()
            .instructions
            .push(Instruction::with_result(kind, value, ty));
        self.defined.insert(value);
        Ok(value)
    }

    /// Appends a terminator, closing out the current block.
    pub fn emit_terminator(&mut self, kind: InstKind) -> IrResult<()> {
        debug_assert!(kind.is_terminator());
        if self.current_block_mut().has_terminator() {
            return Err(IrError::MultipleTerminators(self.function.name.clone(), self.current_block));
        }
        self.check_operands(&kind)?;
        for succ in kind.successors() {
            if self.function.block(succ).is_none() {
                return Err(IrError::UnknownSuccessor {
                    function: self.function.name.clone(),
                    block: self.current_block,
                    target: succ,
                });
            }
        }
        self.current_block_mut().instructions.push(Instruction::new(kind));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Linkage;
    use silc_types::TypeInterner;

    #[test]
    fn building_a_return_of_a_literal_succeeds() {
        let interner = TypeInterner::new();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], int_ty.clone(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));

        let mut builder = Builder::at(&mut function, entry);
        let v = builder
            .emit_with_result(InstKind::IntegerLiteral { ty: int_ty.clone(), value: 1 }, int_ty)
            .unwrap();
        builder.emit_terminator(InstKind::Return { operand: Some(v) }).unwrap();

        assert!(function.block(entry).unwrap().has_terminator());
    }

    #[test]
    fn using_an_undefined_value_is_rejected() {
        let interner = TypeInterner::new();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], int_ty.clone(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));

        let bogus = ValueId(999);
        let mut builder = Builder::at(&mut function, entry);
        let result = builder.emit_terminator(InstKind::Return { operand: Some(bogus) });
        assert!(result.is_err());
    }

    #[test]
    fn emitting_after_a_terminator_is_rejected() {
        let interner = TypeInterner::new();
        let int_ty = interner.int();
        let fn_ty = interner.function(vec![], int_ty.clone(), false);
        let mut function = Function::new("f", fn_ty, Linkage::Hidden);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));

        let mut builder = Builder::at(&mut function, entry);
        builder.emit_terminator(InstKind::Unreachable).unwrap();
        let result = builder.emit(InstKind::StrongRetain { operand: ValueId(0) });
        assert!(result.is_err());
    }
}
