//! golfbench Core Library
//!
//! Benchmark-execution and ranking harness for a code-golf competition:
//! submissions are compiled for a stack VM, run against a fixed battery,
//! checked against a reference oracle, scored and ranked.
//!
//! ## Key Components
//!
//! - `Oracle`: memoized Fibonacci reference values
//! - `Executor`: compile once, run every battery input on a fresh machine
//! - `scorer`: evaluation metrics into a `ScoreRecord`
//! - `Leaderboard`: ranked repository over a `ScoreStore`
//! - `Harness`: `submit` / `check` / `leaderboard` entry points

pub mod config;
pub mod domain;
pub mod executor;
pub mod harness;
pub mod intake;
pub mod leaderboard;
pub mod metrics;
pub mod obs;
pub mod oracle;
pub mod scorer;
pub mod telemetry;
pub mod vm;

pub use config::{ConfigError, HarnessConfig};
pub use domain::{CaseOutcome, Evaluation, GolfError, Result, TestBattery, STANDARD_INPUTS};
pub use executor::Executor;
pub use harness::Harness;
pub use intake::{normalize_source, IntakeError, Submission, MAX_NAME_LEN};
pub use leaderboard::Leaderboard;
pub use oracle::{fibonacci, MemoryReferenceCache, Oracle, ReferenceCache};
pub use scorer::{score, score_evaluation};
pub use vm::{Bytecode, CompileError, Machine, StackVm, VmBackend, VmFault, VmLimits};

pub use golfbench_store::{
    MemoryScoreStore, ScoreId, ScoreRecord, ScoreStore, StorageError, SurrealScoreStore,
};

/// Crate version, shown by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
