use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("bad magic number: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),
    #[error("truncated input: expected at least {needed} more bytes, found {available}")]
    Truncated { needed: usize, available: usize },
    #[error("record payload corrupt: {0}")]
    CorruptRecord(String),
    #[error("no entry named `{0}` in this table")]
    NotFound(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type SerializeResult<T> = Result<T, SerializeError>;
