//! Reads and writes `silc-ir` modules to a length-prefixed, hash-table
//! indexed container, grounded on `messense-llvm-bitcode-rs`'s
//! signature/block/record framing and on
//! `original_source/lib/Serialization/{Serialize,Deserialize}SIL.cpp`'s
//! emission rules and on-disk directory structure. The container here
//! swaps that format's bit-packed abbreviation encoding for `serde_json`
//! record payloads inside a hand-rolled tag-length-value frame — the
//! structural contract (signature, block, four name-indexed directories,
//! lazy per-record deserialization) is preserved; the bit-level codec is
//! not.

pub mod cache;
pub mod container;
pub mod emission;
pub mod errors;
pub mod hashtable;
pub mod records;
pub mod signature;

pub use cache::{CacheState, LazyEntry};
pub use container::{write_module, ExternalLinker, LazyModule};
pub use emission::{plan_emission, EmissionPolicy};
pub use errors::{SerializeError, SerializeResult};
pub use hashtable::OnDiskHashTable;
pub use records::{read_record, write_record, RecordKind};
pub use signature::Signature;
