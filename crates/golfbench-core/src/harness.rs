//! Harness entry points: `submit`, `check` and `leaderboard`.
//!
//! Evaluation is CPU-bound, so it runs on tokio's blocking pool while the
//! store calls stay on the async runtime. Independent submissions may be
//! evaluated concurrently; the store serializes writes.

use std::sync::Arc;

use golfbench_store::{ScoreRecord, ScoreStore};
use tracing::Instrument;

use crate::config::HarnessConfig;
use crate::domain::{Evaluation, GolfError, Result, TestBattery};
use crate::executor::Executor;
use crate::leaderboard::Leaderboard;
use crate::metrics::METRICS;
use crate::obs::SubmissionSpan;
use crate::oracle::{MemoryReferenceCache, Oracle, ReferenceCache};
use crate::scorer;
use crate::vm::{StackVm, VmBackend};

pub struct Harness<B: VmBackend> {
    executor: Arc<Executor<B>>,
    leaderboard: Leaderboard,
}

impl<B: VmBackend> Clone for Harness<B> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            leaderboard: self.leaderboard.clone(),
        }
    }
}

impl Harness<StackVm> {
    /// Stack-VM harness over the standard battery, built from `config`.
    /// The oracle cache is warmed before returning.
    pub fn from_config(config: &HarnessConfig, store: Arc<dyn ScoreStore>) -> Result<Self> {
        config.validate()?;
        let cache: Arc<dyn ReferenceCache> = match config.oracle_cache_capacity {
            Some(capacity) => Arc::new(MemoryReferenceCache::bounded(capacity)),
            None => Arc::new(MemoryReferenceCache::unbounded()),
        };
        let battery = Arc::new(TestBattery::standard());
        let oracle = Arc::new(Oracle::new(cache));
        oracle.warm(&battery);

        let executor = Executor::new(StackVm::new(config.vm_limits()), battery, oracle);
        let leaderboard = Leaderboard::new(store, config.leaderboard_size);
        Ok(Self::new(executor, leaderboard))
    }
}

impl<B: VmBackend + 'static> Harness<B> {
    pub fn new(executor: Executor<B>, leaderboard: Leaderboard) -> Self {
        Self {
            executor: Arc::new(executor),
            leaderboard,
        }
    }

    pub fn battery(&self) -> &TestBattery {
        self.executor.battery()
    }

    pub fn oracle(&self) -> &Oracle {
        self.executor.oracle()
    }

    pub fn board(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Evaluate, score and record a submission.
    ///
    /// A compile error rejects the submission: nothing is recorded.
    pub async fn submit(&self, name: &str, source: &str) -> Result<ScoreRecord> {
        let evaluation = self.evaluate(name, source).await?;
        let record = scorer::score_evaluation(name, source, &evaluation);
        self.leaderboard
            .record(&record)
            .instrument(tracing::info_span!("golfbench.record", submitter = %name))
            .await?;
        Ok(record)
    }

    /// Dry run: evaluate without scoring or recording.
    pub async fn check(&self, source: &str) -> Result<Evaluation> {
        self.evaluate("(check)", source).await
    }

    /// The `limit` best records, best first.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        Ok(self.leaderboard.top_ranked(limit).await?)
    }

    /// The configured top-N window.
    pub async fn display(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.leaderboard.display().await?)
    }

    pub async fn total_records(&self) -> Result<u64> {
        Ok(self.leaderboard.total_records().await?)
    }

    async fn evaluate(&self, name: &str, source: &str) -> Result<Evaluation> {
        let executor = Arc::clone(&self.executor);
        let name = name.to_string();
        let source = source.to_string();

        let outcome = tokio::task::spawn_blocking(move || {
            let _span = SubmissionSpan::enter(&name);
            executor.evaluate(&source)
        })
        .await
        .map_err(|err| GolfError::EvaluationAborted(err.to_string()))?;

        let evaluation = outcome?;
        METRICS.inc_submissions_evaluated();
        Ok(evaluation)
    }
}

impl<B: VmBackend> std::fmt::Debug for Harness<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("battery_len", &self.executor.battery().len())
            .field("leaderboard", &self.leaderboard)
            .finish()
    }
}
