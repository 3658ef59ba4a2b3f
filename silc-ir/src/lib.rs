//! The typed, SSA control-flow-graph intermediate representation: a
//! closed instruction set with explicit reference-counting instructions,
//! organized into functions of basic blocks inside a module. Grounded on
//! the registry shape of `original_source/lib/SIL/SILModule.cpp` and the
//! Rust-idiomatic instruction/record representation in
//! `messense-llvm-bitcode-rs`.

pub mod builder;
pub mod clone;
pub mod conformance;
pub mod errors;
pub mod function;
pub mod instruction;
pub mod module;
pub mod value;
pub mod verify;

pub use builder::Builder;
pub use clone::{clone_specialized, Substitutions};
pub use conformance::{Conformance, ConformanceKind, SubstitutionList, VTable, VTableEntry, WitnessEntry, WitnessTable};
pub use errors::{IrError, IrResult};
pub use function::{BasicBlock, Function, FunctionFlags, GenericParam, Linkage};
pub use instruction::{CastKind, InstKind, Instruction, MarkUninitKind};
pub use module::{GlobalVariable, LinkMode, Module};
pub use value::{BlockId, InstId, ValueId, ValueIdGen};
pub use verify::verify_function;
