//! The optimization layer above `silc-ir`: a scheduling pass manager,
//! the generic specializer, and the reference-count pairing dataflow.

pub mod manager;
pub mod rc_dataflow;
pub mod specializer;

pub use manager::{CompleteFunctions, FunctionTransform, ModuleTransform, PassManager, RunStats};
pub use rc_dataflow::{find_pairs, RcDataflowOptions, RcPair, RcState};
pub use specializer::specialize_module;
