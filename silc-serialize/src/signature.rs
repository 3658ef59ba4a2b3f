//! The container's four-byte magic plus a version word, in the shape of
//! `messense-llvm-bitcode-rs::bitcode::Signature` — the first bytes any
//! reader checks before trusting the rest of the file.

use crate::errors::{SerializeError, SerializeResult};

pub const MAGIC: [u8; 4] = *b"SILC";
pub const VERSION: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub magic: [u8; 4],
    pub version: u16,
}

impl Signature {
    pub fn current() -> Self {
        Self { magic: MAGIC, version: VERSION }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.version.to_le_bytes());
    }

    /// Reads the signature from the front of `bytes`, returning it along
    /// with the remaining, unconsumed slice.
    pub fn read(bytes: &[u8]) -> SerializeResult<(Self, &[u8])> {
        if bytes.len() < 6 {
            return Err(SerializeError::Truncated { needed: 6, available: bytes.len() });
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != MAGIC {
            return Err(SerializeError::BadMagic { expected: MAGIC, found: magic });
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(SerializeError::UnsupportedVersion(version));
        }
        Ok((Self { magic, version }, &bytes[6..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let mut buf = Vec::new();
        Signature::current().write(&mut buf);
        let (sig, rest) = Signature::read(&buf).unwrap();
        assert_eq!(sig, Signature::current());
        assert!(rest.is_empty());
    }

    #[test]
    fn rejects_a_bad_magic_number() {
        let buf = vec![b'N', b'O', b'P', b'E', 1, 0];
        assert!(matches!(Signature::read(&buf), Err(SerializeError::BadMagic { .. })));
    }
}
