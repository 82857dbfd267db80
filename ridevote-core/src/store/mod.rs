//! Persistence collaborators for rankings and display metadata.
//!
//! [`RankingStore`] holds one [`UserRanking`] per member, keyed by user
//! name, and pushes full snapshots to subscribers after every change.
//! [`DisplayStore`] holds the admin-editable overrides and branding.
//! Aggregation never talks to a store directly: callers read a snapshot and
//! pass it on.

use thiserror::Error;

use crate::{AppBranding, AttractionOverride, UserName, UserRanking};

mod feed;
mod memory;

pub use feed::{Publication, RankingFeed, RankingListener, Subscription};
pub use memory::MemoryRankingStore;

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not complete the operation.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Backend error description.
        message: String,
    },
    /// A stored record could not be decoded.
    #[error("stored record {key} is corrupt: {message}")]
    Corrupt {
        /// Key of the unreadable record.
        key: String,
        /// Decoder error description.
        message: String,
    },
}

/// Outcome of [`RankingStore::delete_all_rankings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Number of rankings removed.
    pub deleted: usize,
}

/// Shared storage of member rankings.
///
/// Writes are last-writer-wins per user name; a write for one member never
/// touches another member's record.
///
/// # Examples
///
/// ```
/// use ridevote_core::{AttractionId, MemoryRankingStore, RankingStore, UserName, UserRanking};
///
/// let store = MemoryRankingStore::default();
/// let leo = UserName::new("Leo")?;
/// store.put_ranking(UserRanking::new(leo.clone(), vec![AttractionId::new("dlp_2")?], 1)?)?;
///
/// assert!(store.get_ranking(&leo)?.is_some());
/// assert_eq!(store.delete_all_rankings()?.deleted, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait RankingStore: Send + Sync {
    /// Every stored ranking, ordered by user name.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn all_rankings(&self) -> Result<Vec<UserRanking>, StoreError>;

    /// The ranking stored for `user`, if any.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn get_ranking(&self, user: &UserName) -> Result<Option<UserRanking>, StoreError>;

    /// Insert or replace the ranking keyed by its user name.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails; nothing is written.
    fn put_ranking(&self, ranking: UserRanking) -> Result<(), StoreError>;

    /// Remove every ranking in one step.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails; nothing is removed.
    fn delete_all_rankings(&self) -> Result<ResetReport, StoreError>;

    /// Receive the current snapshot now and again after every change.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the initial snapshot cannot be read.
    fn subscribe(&self, listener: RankingListener) -> Result<Subscription, StoreError>;
}

/// Admin-editable presentation data.
pub trait DisplayStore: Send + Sync {
    /// Every stored attraction override.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn attraction_overrides(&self) -> Result<Vec<AttractionOverride>, StoreError>;

    /// Insert or replace the override for its attraction id.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn put_attraction_override(&self, entry: AttractionOverride) -> Result<(), StoreError>;

    /// Stored branding, or the default when none was saved.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn branding(&self) -> Result<AppBranding, StoreError>;

    /// Replace the branding.
    ///
    /// # Errors
    /// Returns a [`StoreError`] when the backend fails.
    fn put_branding(&self, branding: AppBranding) -> Result<(), StoreError>;
}
