//! Harness-level error taxonomy.
//!
//! Execution faults never appear here: they are absorbed per battery input
//! by the executor.

use golfbench_store::StorageError;

use crate::config::ConfigError;
use crate::vm::CompileError;

/// golfbench harness errors.
#[derive(Debug, thiserror::Error)]
pub enum GolfError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompileError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("evaluation aborted: {0}")]
    EvaluationAborted(String),
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, GolfError>;
