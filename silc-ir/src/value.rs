//! SSA value identity: spec §3.3's "a producing node plus a result-index"
//! collapses here to a single per-function integer id, minted once per
//! produced value (instruction result or block argument) — equivalent to
//! addressing by (producer, index) since every id is issued exactly once,
//! but cheaper to use as a map key everywhere the IR threads operands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstId(pub u32);

/// Mints fresh, function-local [`ValueId`]s in the order values are
/// produced — block arguments first, then each instruction's results, as
/// the deserializer's local value-id assignment order requires (spec
/// §4.7: "assigns local value-ids in the same order the writer did").
#[derive(Debug, Default)]
pub struct ValueIdGen {
    next: u32,
}

impl ValueIdGen {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next(&mut self) -> ValueId {
        let id = ValueId(self.next);
        self.next += 1;
        id
    }
}
