//! An on-disk name-to-offset table: serialized as a count followed by
//! `(name length, name bytes, offset)` triples, loaded back into an
//! in-memory `HashMap` for O(1) lookup — the simplified analog of
//! LLVM's on-disk chained hash table used for the four directories
//! (functions, v-tables, globals, witness tables) the data model names.

use crate::errors::{SerializeError, SerializeResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct OnDiskHashTable {
    entries: HashMap<String, u64>,
}

impl OnDiskHashTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, offset: u64) {
        self.entries.insert(name.into(), offset);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        let mut names: Vec<_> = self.entries.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (name, offset) in names {
            let bytes = name.as_bytes();
            out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            out.extend_from_slice(bytes);
            out.extend_from_slice(&offset.to_le_bytes());
        }
    }

    pub fn read(bytes: &[u8]) -> SerializeResult<(Self, &[u8])> {
        if bytes.len() < 4 {
            return Err(SerializeError::Truncated { needed: 4, available: bytes.len() });
        }
        let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let mut cursor = 4usize;
        let mut table = Self::new();
        for _ in 0..count {
            if bytes.len() < cursor + 4 {
                return Err(SerializeError::Truncated { needed: cursor + 4, available: bytes.len() });
            }
            let name_len =
                u32::from_le_bytes([bytes[cursor], bytes[cursor + 1], bytes[cursor + 2], bytes[cursor + 3]]) as usize;
            cursor += 4;
            if bytes.len() < cursor + name_len + 8 {
                return Err(SerializeError::Truncated { needed: cursor + name_len + 8, available: bytes.len() });
            }
            let name = String::from_utf8(bytes[cursor..cursor + name_len].to_vec())
                .map_err(|e| SerializeError::CorruptRecord(e.to_string()))?;
            cursor += name_len;
            let mut offset_bytes = [0u8; 8];
            offset_bytes.copy_from_slice(&bytes[cursor..cursor + 8]);
            let offset = u64::from_le_bytes(offset_bytes);
            cursor += 8;
            table.insert(name, offset);
        }
        Ok((table, &bytes[cursor..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_table_with_several_entries() {
        let mut table = OnDiskHashTable::new();
        table.insert("f", 0);
        table.insert("g", 42);

        let mut buf = Vec::new();
        table.write(&mut buf);
        let (read_back, rest) = OnDiskHashTable::read(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(read_back.get("f"), Some(0));
        assert_eq!(read_back.get("g"), Some(42));
        assert_eq!(read_back.len(), 2);
    }

    #[test]
    fn missing_name_returns_none() {
        let table = OnDiskHashTable::new();
        assert_eq!(table.get("nope"), None);
    }
}
