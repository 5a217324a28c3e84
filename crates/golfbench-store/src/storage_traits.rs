//! Storage trait definitions for golfbench
//!
//! - `ScoreRecord`: one evaluated submission, immutable after creation
//! - `ScoreStore`: append-only score persistence with ranked window queries
//!
//! The trait is async and backend-agnostic. See [`crate::memory`] for the
//! in-process store and [`crate::surreal_store`] for SurrealDB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Unique identifier for a stored score row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreId(pub uuid::Uuid);

impl ScoreId {
    /// Generate a new random ScoreId
    pub fn new() -> Self {
        ScoreId(uuid::Uuid::new_v4())
    }
}

impl Default for ScoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One evaluated submission.
///
/// Fields are read-only: a record is built once by the scorer and never
/// changes afterwards. `score_id` and `submitted_at` identify the row; they
/// take no part in ranking or in duplicate detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub(crate) score_id: ScoreId,
    pub(crate) submitter_name: String,
    pub(crate) source_code: String,
    pub(crate) passed_count: u32,
    pub(crate) code_length: u64,
    pub(crate) execution_cost: u64,
    pub(crate) submitted_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Create a new record stamped with a fresh id and the current time.
    pub fn new(
        submitter_name: impl Into<String>,
        source_code: impl Into<String>,
        passed_count: u32,
        code_length: u64,
        execution_cost: u64,
    ) -> Self {
        Self {
            score_id: ScoreId::new(),
            submitter_name: submitter_name.into(),
            source_code: source_code.into(),
            passed_count,
            code_length,
            execution_cost,
            submitted_at: Utc::now(),
        }
    }

    pub fn score_id(&self) -> ScoreId {
        self.score_id
    }

    pub fn submitter_name(&self) -> &str {
        &self.submitter_name
    }

    /// The submitted program text, verbatim.
    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    /// Number of battery inputs whose output matched the oracle.
    pub fn passed_count(&self) -> u32 {
        self.passed_count
    }

    /// Size of the compiled bytecode in bytes.
    pub fn code_length(&self) -> u64 {
        self.code_length
    }

    /// Instructions executed, summed over the whole battery.
    pub fn execution_cost(&self) -> u64 {
        self.execution_cost
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Duplicate detection: same submitter, same program, same outcome.
impl PartialEq for ScoreRecord {
    fn eq(&self, other: &Self) -> bool {
        self.submitter_name == other.submitter_name
            && self.passed_count == other.passed_count
            && self.source_code == other.source_code
            && self.code_length == other.code_length
            && self.execution_cost == other.execution_cost
    }
}

impl Eq for ScoreRecord {}

/// Append-only score store.
///
/// Guarantees:
/// - `insert_score` is atomic: a record is either fully stored or absent.
/// - Rows are never merged or overwritten; resubmissions add new rows.
/// - `top_scores(limit)` returns `min(limit, count)` records ordered by
///   [`crate::ranking::compare`], with full ties in submission order.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Append a score record.
    async fn insert_score(&self, record: &ScoreRecord) -> StorageResult<()>;

    /// Retrieve the `limit` best-ranked records.
    async fn top_scores(&self, limit: usize) -> StorageResult<Vec<ScoreRecord>>;

    /// Total number of stored records.
    async fn count(&self) -> StorageResult<u64>;
}
