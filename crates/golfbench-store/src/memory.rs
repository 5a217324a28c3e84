//! In-memory score store
//!
//! `MemoryScoreStore` satisfies the [`ScoreStore`] contract without any
//! external dependencies. Used by tests and by the CLI's `--memory` mode.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ranking::window_order;
use crate::storage_traits::{ScoreRecord, ScoreStore, StorageResult};

/// Score store backed by a `Vec<ScoreRecord>` in submission order.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<ScoreRecord>> {
        // A panicking writer cannot leave a half-pushed row behind.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert_score(&self, record: &ScoreRecord) -> StorageResult<()> {
        self.rows().push(record.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> StorageResult<Vec<ScoreRecord>> {
        let mut ranked = self.rows().clone();
        ranked.sort_by(window_order);
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.rows().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_nothing() {
        let store = MemoryScoreStore::new();
        assert!(store.top_scores(10).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_limit_returns_nothing() {
        let store = MemoryScoreStore::new();
        store
            .insert_score(&ScoreRecord::new("a", "ret", 0, 1, 35))
            .await
            .unwrap();
        assert!(store.top_scores(0).await.unwrap().is_empty());
    }
}
