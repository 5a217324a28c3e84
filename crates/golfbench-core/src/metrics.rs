//! Process-wide atomic counters for the harness.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single `info!` event
//! (the CLI does so before exiting).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations or locks.
pub struct Metrics {
    submissions_evaluated: AtomicU64,
    battery_runs: AtomicU64,
    execution_faults: AtomicU64,
    compile_failures: AtomicU64,
    scores_recorded: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            submissions_evaluated: AtomicU64::new(0),
            battery_runs: AtomicU64::new(0),
            execution_faults: AtomicU64::new(0),
            compile_failures: AtomicU64::new(0),
            scores_recorded: AtomicU64::new(0),
        }
    }

    pub fn inc_submissions_evaluated(&self) {
        self.submissions_evaluated.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "submissions_evaluated", "counter incremented");
    }

    pub fn inc_battery_runs(&self) {
        self.battery_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_execution_faults(&self) {
        self.execution_faults.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "execution_faults", "counter incremented");
    }

    pub fn inc_compile_failures(&self) {
        self.compile_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "compile_failures", "counter incremented");
    }

    pub fn inc_scores_recorded(&self) {
        self.scores_recorded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "scores_recorded", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            submissions_evaluated = self.submissions_evaluated(),
            battery_runs = self.battery_runs(),
            execution_faults = self.execution_faults(),
            compile_failures = self.compile_failures(),
            scores_recorded = self.scores_recorded(),
        );
    }

    pub fn submissions_evaluated(&self) -> u64 {
        self.submissions_evaluated.load(Ordering::Relaxed)
    }

    pub fn battery_runs(&self) -> u64 {
        self.battery_runs.load(Ordering::Relaxed)
    }

    pub fn execution_faults(&self) -> u64 {
        self.execution_faults.load(Ordering::Relaxed)
    }

    pub fn compile_failures(&self) -> u64 {
        self.compile_failures.load(Ordering::Relaxed)
    }

    pub fn scores_recorded(&self) -> u64 {
        self.scores_recorded.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.submissions_evaluated.store(0, Ordering::Relaxed);
        self.battery_runs.store(0, Ordering::Relaxed);
        self.execution_faults.store(0, Ordering::Relaxed);
        self.compile_failures.store(0, Ordering::Relaxed);
        self.scores_recorded.store(0, Ordering::Relaxed);
    }
}
