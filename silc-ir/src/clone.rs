//! Type-substituting function cloner: the specializer's core mechanism
//! for turning a generic function plus a substitution map into a
//! concrete, monomorphized clone with a fresh name and fresh value ids.

use crate::function::{BasicBlock, Function};
use crate::instruction::{InstKind, Instruction};
use crate::value::{BlockId, ValueId};
use silc_types::{Ty, TypeInterner};
use std::collections::HashMap;

pub struct Substitutions<'a> {
    pub interner: &'a TypeInterner,
    /// Maps each generic parameter's `(depth, index)` to its replacement.
    pub map: HashMap<(u32, u32), Ty>,
}

impl<'a> Substitutions<'a> {
    /// Recurses through `ty` replacing every archetype whose `(depth,
    /// index)` is in the map. Doesn't use [`Ty::substitute`]'s
    /// pointer-equality pairing since the substitution here is keyed by
    /// archetype identity, not by a specific interned instance.
    pub fn substitute(&self, ty: &Ty) -> Ty {
        match ty.as_ref() {
            silc_types::TyKind::Archetype { depth, index, .. } => {
                self.map.get(&(*depth, *index)).cloned().unwrap_or_else(|| ty.clone())
            }
            silc_types::TyKind::Nominal { decl, name, args } => {
                let new_args = args.iter().map(|a| self.substitute(a)).collect();
                self.interner.nominal(*decl, name.clone(), new_args)
            }
            silc_types::TyKind::Tuple(elems) => {
                let new_elems = elems.iter().map(|e| self.substitute(e)).collect();
                self.interner.tuple(new_elems)
            }
            silc_types::TyKind::Function { params, result, throws } => {
                let new_params = params.iter().map(|p| self.substitute(p)).collect();
                let new_result = self.substitute(result);
                self.interner.function(new_params, new_result, *throws)
            }
            silc_types::TyKind::Metatype(instance) => {
                let new_instance = self.substitute(instance);
                self.interner.metatype(new_instance)
            }
            silc_types::TyKind::Builtin(_) | silc_types::TyKind::Error(_) => ty.clone(),
        }
    }
}

/// Clones `source` under `subst`, renaming it to `new_name` and
/// renumbering every value and block so the clone is a self-contained,
/// independently valid function with a monomorphic (empty) generic
/// parameter list.
pub fn clone_specialized(source: &Function, subst: &Substitutions, new_name: impl Into<String>) -> Function {
    let mut value_map: HashMap<ValueId, ValueId> = HashMap::new();
    let mut block_map: HashMap<BlockId, BlockId> = HashMap::new();

    let new_ty = subst.substitute(&source.ty);
    let mut target = Function::new(new_name, new_ty, source.linkage);
    target.flags = source.flags.clone();

    for block in &source.blocks {
        let new_id = target.fresh_block();
        block_map.insert(block.id, new_id);
    }

    for block in &source.blocks {
        let new_id = block_map[&block.id];
        let mut new_block = BasicBlock::new(new_id);
        for (v, ty) in &block.args {
            let new_v = target.fresh_value();
            value_map.insert(*v, new_v);
            new_block.args.push((new_v, subst.substitute(ty)));
        }
        target.blocks.push(new_block);
    }

    for block in &source.blocks {
        let new_id = block_map[&block.id];
        for inst in &block.instructions {
            let new_kind = remap_kind(&inst.kind, &value_map, &block_map, subst);
            let mut results = Vec::new();
            for (v, ty) in &inst.results {
                let new_v = target.fresh_value();
                value_map.insert(*v, new_v);
                results.push((new_v, subst.substitute(ty)));
            }
            let block_mut = target.block_mut(new_id).expect("block just created");
            block_mut.instructions.push(Instruction { kind: new_kind, results });
        }
    }

    target
}

fn remap_value(v: ValueId, map: &HashMap<ValueId, ValueId>) -> ValueId {
    *map.get(&v).unwrap_or(&v)
}

fn remap_kind(
    kind: &InstKind,
    values: &HashMap<ValueId, ValueId>,
    blocks: &HashMap<BlockId, BlockId>,
    subst: &Substitutions,
) -> InstKind {
    let rv = |v: &ValueId| remap_value(*v, values);
    let rb = |b: &BlockId| *blocks.get(b).unwrap_or(b);
    match kind {
        InstKind::AllocStack { ty } => InstKind::AllocStack { ty: subst.substitute(ty) },
        InstKind::AllocRef { ty } => InstKind::AllocRef { ty: subst.substitute(ty) },
        InstKind::AllocRefDynamic { metatype, ty } => {
            InstKind::AllocRefDynamic { metatype: rv(metatype), ty: subst.substitute(ty) }
        }
        InstKind::AllocBox { ty } => InstKind::AllocBox { ty: subst.substitute(ty) },
        InstKind::AllocArray { element_ty, count } => {
            InstKind::AllocArray { element_ty: subst.substitute(element_ty), count: rv(count) }
        }
        InstKind::DeallocStack { operand } => InstKind::DeallocStack { operand: rv(operand) },
        InstKind::DeallocRef { operand } => InstKind::DeallocRef { operand: rv(operand) },
        InstKind::DeallocBox { operand } => InstKind::DeallocBox { operand: rv(operand) },
        InstKind::Load { address } => InstKind::Load { address: rv(address) },
        InstKind::Store { value, address } => InstKind::Store { value: rv(value), address: rv(address) },
        InstKind::Assign { value, address } => InstKind::Assign { value: rv(value), address: rv(address) },
        InstKind::CopyAddr { src, dest, take, initialize } => {
            InstKind::CopyAddr { src: rv(src), dest: rv(dest), take: *take, initialize: *initialize }
        }
        InstKind::IndexAddr { base, index } => InstKind::IndexAddr { base: rv(base), index: rv(index) },
        InstKind::MarkUninitialized { operand, kind } => {
            InstKind::MarkUninitialized { operand: rv(operand), kind: *kind }
        }
        InstKind::StrongRetain { operand } => InstKind::StrongRetain { operand: rv(operand) },
        InstKind::StrongRelease { operand } => InstKind::StrongRelease { operand: rv(operand) },
        InstKind::RetainValue { operand } => InstKind::RetainValue { operand: rv(operand) },
        InstKind::ReleaseValue { operand } => InstKind::ReleaseValue { operand: rv(operand) },
        InstKind::UnownedRetain { operand } => InstKind::UnownedRetain { operand: rv(operand) },
        InstKind::UnownedRelease { operand } => InstKind::UnownedRelease { operand: rv(operand) },
        InstKind::AutoreleaseReturn { operand } => InstKind::AutoreleaseReturn { operand: rv(operand) },
        InstKind::AutoreleaseValue { operand } => InstKind::AutoreleaseValue { operand: rv(operand) },
        InstKind::FunctionRef { function } => InstKind::FunctionRef { function: function.clone() },
        InstKind::BuiltinRef { name } => InstKind::BuiltinRef { name: name.clone() },
        InstKind::Apply { callee, substitutions, args } => InstKind::Apply {
            callee: rv(callee),
            substitutions: substitutions.iter().map(|t| subst.substitute(t)).collect(),
            args: args.iter().map(rv).collect(),
        },
        InstKind::PartialApply { callee, substitutions, args } => InstKind::PartialApply {
            callee: rv(callee),
            substitutions: substitutions.iter().map(|t| subst.substitute(t)).collect(),
            args: args.iter().map(rv).collect(),
        },
        InstKind::Tuple { elements } => InstKind::Tuple { elements: elements.iter().map(rv).collect() },
        InstKind::TupleExtract { operand, index } => InstKind::TupleExtract { operand: rv(operand), index: *index },
        InstKind::TupleElementAddr { operand, index } => {
            InstKind::TupleElementAddr { operand: rv(operand), index: *index }
        }
        InstKind::Struct { ty, fields } => {
            InstKind::Struct { ty: subst.substitute(ty), fields: fields.iter().map(rv).collect() }
        }
        InstKind::StructExtract { operand, field } => InstKind::StructExtract { operand: rv(operand), field: *field },
        InstKind::StructElementAddr { operand, field } => {
            InstKind::StructElementAddr { operand: rv(operand), field: *field }
        }
        InstKind::Enum { ty, case, payload } => {
            InstKind::Enum { ty: subst.substitute(ty), case: *case, payload: payload.as_ref().map(rv) }
        }
        InstKind::UncheckedEnumData { operand, case } => {
            InstKind::UncheckedEnumData { operand: rv(operand), case: *case }
        }
        InstKind::UncheckedTakeEnumDataAddr { operand, case } => {
            InstKind::UncheckedTakeEnumDataAddr { operand: rv(operand), case: *case }
        }
        InstKind::IntegerLiteral { ty, value } => InstKind::IntegerLiteral { ty: subst.substitute(ty), value: *value },
        InstKind::FloatLiteral { ty, bits } => InstKind::FloatLiteral { ty: subst.substitute(ty), bits: *bits },
        InstKind::StringLiteral { value } => InstKind::StringLiteral { value: value.clone() },
        InstKind::WitnessMethod { ty, member } => InstKind::WitnessMethod { ty: subst.substitute(ty), member: member.clone() },
        InstKind::ClassMethod { operand, member } => InstKind::ClassMethod { operand: rv(operand), member: member.clone() },
        InstKind::SuperMethod { operand, member } => InstKind::SuperMethod { operand: rv(operand), member: member.clone() },
        InstKind::DynamicMethod { operand, member } => InstKind::DynamicMethod { operand: rv(operand), member: member.clone() },
        InstKind::ProtocolMethod { operand, member } => InstKind::ProtocolMethod { operand: rv(operand), member: member.clone() },
        InstKind::CheckedCast { operand, target, kind } => {
            InstKind::CheckedCast { operand: rv(operand), target: subst.substitute(target), kind: *kind }
        }
        InstKind::UnconditionalCast { operand, target, kind } => {
            InstKind::UnconditionalCast { operand: rv(operand), target: subst.substitute(target), kind: *kind }
        }
        InstKind::Branch { target, args } => InstKind::Branch { target: rb(target), args: args.iter().map(rv).collect() },
        InstKind::CondBranch { cond, then_block, then_args, else_block, else_args } => InstKind::CondBranch {
            cond: rv(cond),
            then_block: rb(then_block),
            then_args: then_args.iter().map(rv).collect(),
            else_block: rb(else_block),
            else_args: else_args.iter().map(rv).collect(),
        },
        InstKind::SwitchEnum { operand, cases, default } => InstKind::SwitchEnum {
            operand: rv(operand),
            cases: cases.iter().map(|(c, b)| (*c, rb(b))).collect(),
            default: default.as_ref().map(rb),
        },
        InstKind::SwitchEnumAddr { operand, cases, default } => InstKind::SwitchEnumAddr {
            operand: rv(operand),
            cases: cases.iter().map(|(c, b)| (*c, rb(b))).collect(),
            default: default.as_ref().map(rb),
        },
        InstKind::SwitchInt { operand, cases, default } => InstKind::SwitchInt {
            operand: rv(operand),
            cases: cases.iter().map(|(c, b)| (*c, rb(b))).collect(),
            default: default.as_ref().map(rb),
        },
        InstKind::DynamicMethodBranch { operand, member, has_method, no_method } => InstKind::DynamicMethodBranch {
            operand: rv(operand),
            member: member.clone(),
            has_method: rb(has_method),
            no_method: rb(no_method),
        },
        InstKind::Return { operand } => InstKind::Return { operand: operand.as_ref().map(rv) },
        InstKind::Unreachable => InstKind::Unreachable,
        InstKind::CondFail { operand, message } => InstKind::CondFail { operand: rv(operand), message: message.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::function::{BasicBlock, Linkage};
    use silc_types::TypeInterner;

    #[test]
    fn cloning_replaces_archetypes_with_concrete_substitutions() {
        let interner = TypeInterner::new();
        let archetype = interner.archetype("T", 0, 0);
        let fn_ty = interner.function(vec![archetype.clone()], archetype.clone(), false);
        let mut function = Function::new("identity", fn_ty, Linkage::Shared);
        let entry = function.fresh_block();
        function.blocks.push(BasicBlock::new(entry));
        let arg;
        {
            let mut builder = Builder::at(&mut function, entry);
            arg = builder.add_block_arg(entry, archetype.clone());
            builder.emit_terminator(InstKind::Return { operand: Some(arg) }).unwrap();
        }

        let int_ty = interner.int();
        let mut map = HashMap::new();
        map.insert((0u32, 0u32), int_ty.clone());
        let subst = Substitutions { interner: &interner, map };
        let clone = clone_specialized(&function, &subst, "identity_Int");

        assert_eq!(clone.blocks[0].args[0].1, int_ty);
        assert!(clone.generic_params.is_empty());
    }
}
