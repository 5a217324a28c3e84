//! Domain models for golfbench.
//!
//! - `TestBattery`: the fixed, ordered inputs every submission runs against
//! - `Evaluation`: the executor's aggregate outcome for one submission
//! - `GolfError`: harness-level error taxonomy

pub mod battery;
pub mod error;
pub mod evaluation;

pub use battery::{TestBattery, STANDARD_INPUTS};
pub use error::{GolfError, Result};
pub use evaluation::{CaseOutcome, Evaluation};
