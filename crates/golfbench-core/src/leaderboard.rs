//! Leaderboard: a repository over an injected [`ScoreStore`].
//!
//! The store selects the window; the ranking is applied again in memory so
//! display order never depends on backend sort behaviour.

use std::sync::Arc;

use golfbench_store::{sort_ranked, ScoreRecord, ScoreStore, StorageResult};

use crate::metrics::METRICS;
use crate::obs;

#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn ScoreStore>,
    display_size: usize,
}

impl Leaderboard {
    pub fn new(store: Arc<dyn ScoreStore>, display_size: usize) -> Self {
        Self {
            store,
            display_size,
        }
    }

    pub fn display_size(&self) -> usize {
        self.display_size
    }

    /// Append a record. Never merges with or overwrites earlier rows.
    pub async fn record(&self, score: &ScoreRecord) -> StorageResult<()> {
        if let Err(err) = self.store.insert_score(score).await {
            obs::emit_storage_error("insert_score", &err);
            return Err(err);
        }
        METRICS.inc_scores_recorded();
        obs::emit_score_recorded(
            &score.score_id().to_string(),
            score.passed_count(),
            score.code_length(),
            score.execution_cost(),
        );
        Ok(())
    }

    /// The `limit` best records, best first.
    pub async fn top_ranked(&self, limit: usize) -> StorageResult<Vec<ScoreRecord>> {
        let mut window = self.store.top_scores(limit).await.inspect_err(|err| {
            obs::emit_storage_error("top_scores", err);
        })?;
        sort_ranked(&mut window);
        Ok(window)
    }

    /// The top `display_size` records.
    pub async fn display(&self) -> StorageResult<Vec<ScoreRecord>> {
        self.top_ranked(self.display_size).await
    }

    pub async fn total_records(&self) -> StorageResult<u64> {
        self.store.count().await
    }
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("display_size", &self.display_size)
            .finish_non_exhaustive()
    }
}
