//! SurrealDB schema initialization for the score table.

use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all golfbench tables.
///
/// Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing golfbench SurrealDB schema");
    init_scores_table(db).await?;
    Ok(())
}

/// Initialize the `scores` table
///
/// Schema:
/// ```text
/// TABLE scores {
///   score_id:        STRING (unique)
///   submitter_name:  STRING
///   source_code:     STRING
///   passed_count:    INT
///   code_length:     INT
///   execution_cost:  INT
///   submitted_at:    DATETIME
/// }
/// ```
///
/// Rows are append-only: updates and deletes are refused at the table level.
/// The composite rank index follows `ranking::ORDER_BY`.
async fn init_scores_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing scores table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS scores SCHEMAFULL
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update NONE
                FOR delete NONE;

        DEFINE FIELD IF NOT EXISTS score_id ON scores TYPE string;
        DEFINE FIELD IF NOT EXISTS submitter_name ON scores TYPE string ASSERT string::len($value) > 0;
        DEFINE FIELD IF NOT EXISTS source_code ON scores TYPE string;
        DEFINE FIELD IF NOT EXISTS passed_count ON scores TYPE int ASSERT $value >= 0;
        DEFINE FIELD IF NOT EXISTS code_length ON scores TYPE int ASSERT $value >= 0;
        DEFINE FIELD IF NOT EXISTS execution_cost ON scores TYPE int ASSERT $value >= 0;
        DEFINE FIELD IF NOT EXISTS submitted_at ON scores TYPE datetime;

        DEFINE INDEX IF NOT EXISTS idx_score_id ON TABLE scores COLUMNS score_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_rank ON TABLE scores COLUMNS passed_count, code_length, execution_cost, submitted_at;
    "#;

    db.query(sql)
        .await
        .map_err(|e| crate::StateError::SchemaSetup(e.to_string()))?
        .check()
        .map_err(|e| crate::StateError::SchemaSetup(e.to_string()))?;
    info!("scores table initialized");
    Ok(())
}
