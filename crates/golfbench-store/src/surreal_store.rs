//! SurrealDB-backed ScoreStore implementation
//!
//! Uses `schema::ScoreRow` for persistence, converting to/from
//! [`ScoreRecord`] at the boundary.

use async_trait::async_trait;
use serde::Deserialize;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::{StateError, StorageError};
use crate::migrations;
use crate::ranking::ORDER_BY;
use crate::schema::ScoreRow;
use crate::storage_traits::{ScoreRecord, ScoreStore, StorageResult};

/// Default on-disk location when no `SURREALDB_URL` is configured.
pub const DEFAULT_LOCAL_PATH: &str = ".golfbench/db";

const NAMESPACE: &str = "golfbench";
const DATABASE: &str = "main";

/// SurrealDB-backed implementation of [`ScoreStore`].
#[derive(Clone)]
pub struct SurrealScoreStore {
    db: Surreal<Any>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

impl SurrealScoreStore {
    /// Create an in-memory instance (`mem://`).
    pub async fn in_memory() -> crate::Result<Self> {
        let store = Self::connect("mem://").await?;
        info!("SurrealScoreStore connected (in-memory)");
        Ok(store)
    }

    /// Connect to any SurrealDB endpoint (`mem://`, `surrealkv://path`,
    /// `ws://host:port`), select the golfbench namespace and run migrations.
    pub async fn connect(url: &str) -> crate::Result<Self> {
        let db = surrealdb::engine::any::connect(url)
            .await
            .map_err(|e| StateError::Connection(format!("Failed to connect to {url}: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| StateError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;
        Ok(Self { db })
    }

    /// Create from environment variables.
    ///
    /// Uses `SURREALDB_URL` when set, otherwise local persistence under
    /// [`DEFAULT_LOCAL_PATH`].
    pub async fn from_env() -> crate::Result<Self> {
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            let store = Self::connect(&url).await?;
            info!("SurrealScoreStore connected ({})", url);
            return Ok(store);
        }

        std::fs::create_dir_all(DEFAULT_LOCAL_PATH).map_err(|e| {
            StateError::Connection(format!(
                "Failed to create database directory {}: {}",
                DEFAULT_LOCAL_PATH, e
            ))
        })?;
        let url = format!("surrealkv://{}", DEFAULT_LOCAL_PATH);
        info!("No SURREALDB_URL found, using local persistence: {}", url);
        Self::connect(&url).await
    }
}

#[async_trait]
impl ScoreStore for SurrealScoreStore {
    async fn insert_score(&self, record: &ScoreRecord) -> StorageResult<()> {
        let row = ScoreRow::from(record);
        debug!(score_id = %record.score_id(), "inserting score");

        // Single CREATE statement: the row lands whole or not at all.
        let _created: Option<ScoreRow> = self
            .db
            .create("scores")
            .content(row)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> StorageResult<Vec<ScoreRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT * FROM scores ORDER BY {ORDER_BY} LIMIT {limit}");
        let mut res = self
            .db
            .query(sql)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<ScoreRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(ScoreRow::into_record).collect()
    }

    async fn count(&self) -> StorageResult<u64> {
        let mut res = self
            .db
            .query("SELECT count() FROM scores GROUP ALL")
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<CountRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }
}
