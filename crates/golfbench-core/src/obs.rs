//! Structured observability hooks for the submission lifecycle.
//!
//! - Submission-scoped tracing spans via the `SubmissionSpan` RAII guard
//! - Emission functions for: evaluation start/finish, per-input faults,
//!   compile failures, recorded scores and storage failures
//!
//! Events are emitted at `info!` (faults at `warn!`), filtered by
//! `GOLFBENCH_LOG`. For JSON output pass `--json-logs` to the CLI.

use tracing::{info, warn};

/// RAII guard that enters a submission-scoped span.
///
/// ```ignore
/// let _span = SubmissionSpan::enter("alice");
/// // every event below carries submitter = "alice"
/// ```
pub struct SubmissionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SubmissionSpan {
    pub fn enter(submitter: &str) -> Self {
        let span = tracing::info_span!("golfbench.submission", submitter = %submitter);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: evaluation started against a battery.
pub fn emit_evaluation_started(battery_len: usize, battery_digest: &str) {
    info!(
        event = "evaluation.started",
        battery_len = battery_len,
        battery_digest = %battery_digest,
    );
}

/// Emit event: evaluation finished.
pub fn emit_evaluation_finished(
    passed: u32,
    total: usize,
    code_length: u64,
    total_cost: u64,
    faults: usize,
) {
    info!(
        event = "evaluation.finished",
        passed = passed,
        total = total,
        code_length = code_length,
        total_cost = total_cost,
        faults = faults,
    );
}

/// Emit event: a run trapped for one input (warning level).
pub fn emit_case_fault(input: u64, fault: &dyn std::fmt::Display) {
    warn!(event = "evaluation.case_fault", input = input, fault = %fault);
}

/// Emit event: the submission did not compile (warning level).
pub fn emit_compile_failed(error: &dyn std::fmt::Display) {
    warn!(event = "evaluation.compile_failed", error = %error);
}

/// Emit event: a score row was stored.
pub fn emit_score_recorded(score_id: &str, passed: u32, code_length: u64, cost: u64) {
    info!(
        event = "score.recorded",
        score_id = %score_id,
        passed = passed,
        code_length = code_length,
        execution_cost = cost,
    );
}

/// Emit event: a store operation failed (warning level).
pub fn emit_storage_error(operation: &str, error: &dyn std::fmt::Display) {
    warn!(event = "storage.error", operation = %operation, error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_span_enters() {
        let _span = SubmissionSpan::enter("tester");
        emit_case_fault(3, &"stack underflow");
    }
}
