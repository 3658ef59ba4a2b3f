use crate::value::BlockId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrError {
    #[error("function `{0}` has no terminator in block {1:?}")]
    MissingTerminator(String, BlockId),
    #[error("function `{0}` has multiple terminators in block {1:?}")]
    MultipleTerminators(String, BlockId),
    #[error("function `{function}` block {block:?} branches to unknown block {target:?}")]
    UnknownSuccessor { function: String, block: BlockId, target: BlockId },
    #[error("function `{function}` uses value {value:?} before it is defined")]
    UseBeforeDef { function: String, value: crate::value::ValueId },
    #[error("function `{function}` branch to block {target:?} passes {given} arguments, expected {expected}")]
    BlockArgCountMismatch { function: String, target: BlockId, given: usize, expected: usize },
    #[error("duplicate function name `{0}` in module")]
    DuplicateFunction(String),
    #[error("function `{0}` not found")]
    FunctionNotFound(String),
}

pub type IrResult<T> = Result<T, IrError>;
