//! golfbench-store: score persistence for the golfbench harness
//!
//! This crate owns everything that must agree between the database and the
//! in-memory leaderboard: the [`ScoreRecord`] row, the ranking comparator and
//! the [`ScoreStore`] trait with its two backends.
//!
//! ## Layer 0 - Data/Persistence
//!
//! Focus: append-only score rows, atomic inserts, ranked window queries.
//!
//! ## Key Components
//!
//! - `ScoreStore`: async repository trait (`insert_score`, `top_scores`, `count`)
//! - `MemoryScoreStore`: mutex-guarded in-process store
//! - `SurrealScoreStore`: SurrealDB-backed store
//! - `ranking`: the three-key order shared by both levels

mod error;
pub mod memory;
mod migrations;
pub mod ranking;
mod schema;
pub mod storage_traits;
pub mod surreal_store;

pub use error::{StateError, StorageError};
pub use memory::MemoryScoreStore;
pub use ranking::{compare, rank_key, sort_ranked, RankKey};
pub use storage_traits::{ScoreId, ScoreRecord, ScoreStore, StorageResult};
pub use surreal_store::SurrealScoreStore;

/// Result type for connection and schema setup
pub type Result<T> = std::result::Result<T, StateError>;
