//! Record framing inside the SIL block: each record is a one-byte tag,
//! a four-byte little-endian length, then that many bytes of JSON
//! payload — the abbreviation-coded record of the data model reduced to
//! a tag-length-value triple, since the payload codec here is `serde_json`
//! rather than a hand-rolled bit-packed encoding (see the crate's
//! top-level note on that substitution).

use crate::errors::{SerializeError, SerializeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Function = 0,
    VTable = 1,
    WitnessTable = 2,
    Global = 3,
}

impl RecordKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> SerializeResult<Self> {
        match tag {
            0 => Ok(RecordKind::Function),
            1 => Ok(RecordKind::VTable),
            2 => Ok(RecordKind::WitnessTable),
            3 => Ok(RecordKind::Global),
            other => Err(SerializeError::CorruptRecord(format!("unknown record tag {other}"))),
        }
    }
}

/// Appends one record to `out`, returning the byte offset its tag byte
/// was written at — the offset later stored in the on-disk hash table.
pub fn write_record(out: &mut Vec<u8>, kind: RecordKind, payload: &[u8]) -> u64 {
    let offset = out.len() as u64;
    out.push(kind.tag());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    offset
}

/// Reads the record starting at `offset`, returning its kind, payload
/// slice, and the offset immediately past it.
pub fn read_record(bytes: &[u8], offset: u64) -> SerializeResult<(RecordKind, &[u8], u64)> {
    let offset = offset as usize;
    if bytes.len() < offset + 5 {
        return Err(SerializeError::Truncated { needed: offset + 5, available: bytes.len() });
    }
    let kind = RecordKind::from_tag(bytes[offset])?;
    let len = u32::from_le_bytes([bytes[offset + 1], bytes[offset + 2], bytes[offset + 3], bytes[offset + 4]]) as usize;
    let payload_start = offset + 5;
    if bytes.len() < payload_start + len {
        return Err(SerializeError::Truncated { needed: payload_start + len, available: bytes.len() });
    }
    let payload = &bytes[payload_start..payload_start + len];
    Ok((kind, payload, (payload_start + len) as u64))
}
