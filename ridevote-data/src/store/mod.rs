//! Durable store backends.

mod sqlite;

pub use sqlite::{SqliteRankingStore, SqliteStoreError};
