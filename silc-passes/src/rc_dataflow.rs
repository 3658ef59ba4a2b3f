//! Reference-count pairing dataflow, grounded on
//! `original_source/lib/SILAnalysis/RCStateTransition{,Visitors}.cpp`'s
//! four-state classification and its pair of symmetric sweeps: a
//! bottom-up sweep matches each decrement with the nearest preceding
//! increment/entrance of the same value; a top-down sweep matches each
//! increment with the nearest following decrement. Pairs found by both
//! sweeps are the ones a later elimination pass can safely remove.

use silc_ir::{BasicBlock, BlockId, Function, InstKind, ValueId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcState {
    /// A retain-family instruction: the value's strong reference count
    /// goes up by one.
    StrongIncrement,
    /// A release-family instruction: the value's strong reference count
    /// goes down by one.
    StrongDecrement,
    /// The point a strong reference is first produced with an implicit
    /// +1 (a fresh allocation or a call returning an owned value), not
    /// itself a retain instruction but the start of a lifetime a
    /// decrement can pair against.
    StrongEntrance,
    /// Everything else: opaque to this dataflow.
    Unknown,
}

pub fn classify(kind: &InstKind) -> RcState {
    match kind {
        InstKind::StrongRetain { .. } | InstKind::RetainValue { .. } | InstKind::UnownedRetain { .. } => {
            RcState::StrongIncrement
        }
        InstKind::AutoreleaseValue { .. } => RcState::StrongIncrement,
        InstKind::StrongRelease { .. } | InstKind::ReleaseValue { .. } | InstKind::UnownedRelease { .. } => {
            RcState::StrongDecrement
        }
        InstKind::AutoreleaseReturn { .. } => RcState::StrongDecrement,
        InstKind::AllocRef { .. }
        | InstKind::AllocRefDynamic { .. }
        | InstKind::AllocBox { .. }
        | InstKind::Apply { .. } => RcState::StrongEntrance,
        _ => RcState::Unknown,
    }
}

fn rc_operand(kind: &InstKind) -> Option<ValueId> {
    match kind {
        InstKind::StrongRetain { operand }
        | InstKind::StrongRelease { operand }
        | InstKind::RetainValue { operand }
        | InstKind::ReleaseValue { operand }
        | InstKind::UnownedRetain { operand }
        | InstKind::UnownedRelease { operand }
        | InstKind::AutoreleaseReturn { operand }
        | InstKind::AutoreleaseValue { operand } => Some(*operand),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RcPair {
    pub increment_block: BlockId,
    pub increment_index: usize,
    pub decrement_block: BlockId,
    pub decrement_index: usize,
    pub value: ValueId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RcDataflowOptions {
    /// When set, a decrement that is the last instruction before a
    /// block's `Return` is never paired for removal — it balances the
    /// function's epilogue and must stay put even if a matching
    /// increment is visible earlier in the same block.
    pub freeze_epilogue_releases: bool,
}

/// Runs both sweeps over every block of `function` independently (no
/// cross-block matching — a pair must live entirely within one block,
/// which is the conservative, always-safe subset of what the two
/// sweeps can find) and returns the pairs found by both.
pub fn find_pairs(function: &Function, options: RcDataflowOptions) -> Vec<RcPair> {
    let mut pairs = Vec::new();
    for block in &function.blocks {
        let returns_here = matches!(block.terminator().map(|t| &t.kind), Some(InstKind::Return { .. }));
        let frozen_decrement_idx = (options.freeze_epilogue_releases && returns_here)
            .then(|| block.instructions.len().saturating_sub(2));

        let bottom_up = sweep_bottom_up(block, frozen_decrement_idx);
        let top_down = sweep_top_down(block, frozen_decrement_idx);
        let top_down_keys: HashSet<(usize, usize, ValueId)> =
            top_down.iter().map(|p| (p.increment_index, p.decrement_index, p.value)).collect();

        pairs.extend(
            bottom_up
                .into_iter()
                .filter(|p| top_down_keys.contains(&(p.increment_index, p.decrement_index, p.value))),
        );
    }
    pairs
}

/// For each decrement, finds the nearest earlier increment/entrance of the
/// same value not already consumed by an intervening pool boundary or by
/// an earlier decrement of that value.
fn sweep_bottom_up(block: &BasicBlock, frozen_decrement_idx: Option<usize>) -> Vec<RcPair> {
    let mut pairs = Vec::new();
    let mut pending_increments: HashMap<ValueId, usize> = HashMap::new();
    for (idx, inst) in block.instructions.iter().enumerate() {
        if is_autorelease_boundary(inst) {
            pending_increments.clear();
            continue;
        }
        match classify(&inst.kind) {
            RcState::StrongIncrement => {
                if let Some(v) = rc_operand(&inst.kind) {
                    pending_increments.insert(v, idx);
                }
            }
            RcState::StrongEntrance => {
                if let Some((v, _)) = inst.results.first() {
                    pending_increments.insert(*v, idx);
                }
            }
            RcState::StrongDecrement => {
                if Some(idx) == frozen_decrement_idx {
                    continue;
                }
                if let Some(v) = rc_operand(&inst.kind) {
                    if let Some(inc_idx) = pending_increments.remove(&v) {
                        pairs.push(RcPair {
                            increment_block: block.id,
                            increment_index: inc_idx,
                            decrement_block: block.id,
                            decrement_index: idx,
                            value: v,
                        });
                    }
                }
            }
            RcState::Unknown => {}
        }
    }
    pairs
}

/// The symmetric pass: for each increment/entrance, finds the nearest
/// following decrement of the same value, scanning the block in reverse
/// so "nearest following" becomes "nearest already-seen".
fn sweep_top_down(block: &BasicBlock, frozen_decrement_idx: Option<usize>) -> Vec<RcPair> {
    let mut pairs = Vec::new();
    let mut pending_decrements: HashMap<ValueId, usize> = HashMap::new();
    for (idx, inst) in block.instructions.iter().enumerate().rev() {
        if is_autorelease_boundary(inst) {
            pending_decrements.clear();
            continue;
        }
        match classify(&inst.kind) {
            RcState::StrongDecrement => {
                if Some(idx) == frozen_decrement_idx {
                    continue;
                }
                if let Some(v) = rc_operand(&inst.kind) {
                    pending_decrements.insert(v, idx);
                }
            }
            RcState::StrongIncrement => {
                if let Some(v) = rc_operand(&inst.kind) {
                    if let Some(dec_idx) = pending_decrements.remove(&v) {
                        pairs.push(RcPair {
                            increment_block: block.id,
                            increment_index: idx,
                            decrement_block: block.id,
                            decrement_index: dec_idx,
                            value: v,
                        });
                    }
                }
            }
            RcState::StrongEntrance => {
                if let Some((v, _)) = inst.results.first() {
                    if let Some(dec_idx) = pending_decrements.remove(v) {
                        pairs.push(RcPair {
                            increment_block: block.id,
                            increment_index: idx,
                            decrement_block: block.id,
                            decrement_index: dec_idx,
                            value: *v,
                        });
                    }
                }
            }
            RcState::Unknown => {}
        }
    }
    pairs
}

fn is_autorelease_boundary(inst: &silc_ir::Instruction) -> bool {
    if let InstKind::Apply { .. } = &inst.kind {
        return false;
    }
    matches!(&inst.kind, InstKind::BuiltinRef { name } if name == "autoreleasePoolPush" || name == "autoreleasePoolPop")
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ir::{BasicBlock, Builder, Instruction, Linkage};
    use silc_types::TypeInterner;

    fn function_with(instructions: Vec<InstKind>) -> Function {
        let interner = TypeInterner::new();
        let mut f = Function::new("f", interner.function(vec![], interner.void(), false), Linkage::Hidden);
        let entry = f.fresh_block();
        let mut block = BasicBlock::new(entry);
        for kind in instructions {
            block.instructions.push(Instruction::new(kind));
        }
        f.blocks.push(block);
        f
    }

    #[test]
    fn a_retain_followed_by_a_release_of_the_same_value_pairs() {
        let v = ValueId(0);
        let f = function_with(vec![
            InstKind::StrongRetain { operand: v },
            InstKind::StrongRelease { operand: v },
            InstKind::Return { operand: None },
        ]);
        let pairs = find_pairs(&f, RcDataflowOptions::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].value, v);
    }

    #[test]
    fn an_unmatched_release_produces_no_pair() {
        let v = ValueId(0);
        let f = function_with(vec![InstKind::StrongRelease { operand: v }, InstKind::Return { operand: None }]);
        let pairs = find_pairs(&f, RcDataflowOptions::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn freezing_epilogue_releases_drops_the_final_pre_return_pair() {
        let v = ValueId(0);
        let f = function_with(vec![
            InstKind::StrongRetain { operand: v },
            InstKind::StrongRelease { operand: v },
            InstKind::Return { operand: None },
        ]);
        let pairs = find_pairs(&f, RcDataflowOptions { freeze_epilogue_releases: true });
        assert!(pairs.is_empty());
    }

    #[test]
    fn an_autorelease_pool_boundary_clears_pending_increments() {
        let v = ValueId(0);
        let f = function_with(vec![
            InstKind::StrongRetain { operand: v },
            InstKind::BuiltinRef { name: "autoreleasePoolPush".to_string() },
            InstKind::StrongRelease { operand: v },
            InstKind::Return { operand: None },
        ]);
        let pairs = find_pairs(&f, RcDataflowOptions::default());
        assert!(pairs.is_empty());
    }
}
