//! Persistence and network adapters for the ridevote engine.
//!
//! Responsibilities:
//! - Persist rankings, overrides and branding in SQLite.
//! - Call the reasoning service over HTTP.
//! - Remember the local display name between runs.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `ridevote-core`).
//! - Expose synchronous interfaces; async plumbing stays internal.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod fs;
#[cfg(feature = "reasoning-http")]
pub mod reasoning;
pub mod session;
#[cfg(feature = "store-sqlite")]
pub mod store;

#[cfg(feature = "reasoning-http")]
pub use reasoning::{ClientBuildError, HttpItineraryOptimiser, HttpItineraryOptimiserConfig};
pub use session::{SessionFile, SessionFileError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteRankingStore, SqliteStoreError};
