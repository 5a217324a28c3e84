//! SurrealDB row layout for the `scores` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage_traits::{ScoreId, ScoreRecord, StorageResult};

/// Serialize chrono timestamps as native SurrealDB datetimes so that
/// `ORDER BY submitted_at` compares instants rather than strings.
mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// One row of the `scores` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRow {
    /// SurrealDB record ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<surrealdb::sql::Thing>,
    /// Score UUID (string form)
    pub score_id: String,
    pub submitter_name: String,
    pub source_code: String,
    pub passed_count: u64,
    pub code_length: u64,
    pub execution_cost: u64,
    #[serde(with = "surreal_datetime")]
    pub submitted_at: DateTime<Utc>,
}

impl From<&ScoreRecord> for ScoreRow {
    fn from(record: &ScoreRecord) -> Self {
        ScoreRow {
            id: None,
            score_id: record.score_id.to_string(),
            submitter_name: record.submitter_name.clone(),
            source_code: record.source_code.clone(),
            passed_count: u64::from(record.passed_count),
            code_length: record.code_length,
            execution_cost: record.execution_cost,
            submitted_at: record.submitted_at,
        }
    }
}

impl ScoreRow {
    /// Convert a DB row back into a [`ScoreRecord`], checking the invariants
    /// a foreign writer could have broken.
    pub fn into_record(self) -> StorageResult<ScoreRecord> {
        let invalid = |reason: String| StorageError::InvalidRecord {
            score_id: self.score_id.clone(),
            reason,
        };
        let uuid = uuid::Uuid::parse_str(&self.score_id)
            .map_err(|e| invalid(format!("bad score id: {e}")))?;
        let passed_count = u32::try_from(self.passed_count)
            .map_err(|_| invalid(format!("passed_count {} out of range", self.passed_count)))?;

        Ok(ScoreRecord {
            score_id: ScoreId(uuid),
            submitter_name: self.submitter_name,
            source_code: self.source_code,
            passed_count,
            code_length: self.code_length,
            execution_cost: self.execution_cost,
            submitted_at: self.submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_conversion_preserves_record() {
        let record = ScoreRecord::new("dana", "arg 0\nret", 2, 4, 70);
        let row = ScoreRow::from(&record);
        assert_eq!(row.passed_count, 2);
        let back = row.into_record().unwrap();
        assert_eq!(back, record);
        assert_eq!(back.score_id(), record.score_id());
    }

    #[test]
    fn row_with_bad_uuid_is_rejected() {
        let mut row = ScoreRow::from(&ScoreRecord::new("x", "ret", 0, 1, 1));
        row.score_id = "not-a-uuid".to_string();
        assert!(matches!(
            row.into_record(),
            Err(StorageError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn row_with_oversized_pass_count_is_rejected() {
        let mut row = ScoreRow::from(&ScoreRecord::new("x", "ret", 0, 1, 1));
        row.passed_count = u64::from(u32::MAX) + 1;
        assert!(row.into_record().is_err());
    }
}
