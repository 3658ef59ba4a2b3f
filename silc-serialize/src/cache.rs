//! Lazy deserialization: a module loaded from disk keeps every
//! function's raw record bytes around and only deserializes on first
//! use, matching the data model's four cache states.

use crate::errors::SerializeResult;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing about this entry has been looked at yet beyond its name
    /// and on-disk offset.
    Unread,
    /// Enough of the record has been parsed to know its summary (name,
    /// linkage, type) but not its full body.
    Partial,
    /// The full record has been deserialized into memory at least once.
    Full,
    /// The deserialized value is currently held live and reused across
    /// lookups without re-parsing.
    Resident,
}

pub struct LazyEntry<T> {
    bytes: Vec<u8>,
    state: CacheState,
    value: Option<T>,
}

impl<T: DeserializeOwned + Clone> LazyEntry<T> {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, state: CacheState::Unread, value: None }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Deserializes the record if needed and returns a clone, marking
    /// the entry `Resident` so later calls skip re-parsing.
    pub fn force(&mut self) -> SerializeResult<T> {
        if let Some(value) = &self.value {
            self.state = CacheState::Resident;
            return Ok(value.clone());
        }
        let value: T = serde_json::from_slice(&self.bytes)?;
        self.value = Some(value.clone());
        self.state = CacheState::Resident;
        Ok(value)
    }

    /// Marks the entry as having had its summary read without fully
    /// deserializing the body, for callers that only need `name()` or
    /// similar header fields parsed out of the raw bytes separately.
    pub fn mark_partial(&mut self) {
        if self.state == CacheState::Unread {
            self.state = CacheState::Partial;
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.bytes
    }

    /// The deserialized value if one is already resident, without forcing
    /// a parse.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn forcing_deserializes_once_then_stays_resident() {
        let bytes = serde_json::to_vec(&Sample { name: "x".to_string() }).unwrap();
        let mut entry: LazyEntry<Sample> = LazyEntry::new(bytes);
        assert_eq!(entry.state(), CacheState::Unread);
        let value = entry.force().unwrap();
        assert_eq!(value.name, "x");
        assert_eq!(entry.state(), CacheState::Resident);
    }
}
