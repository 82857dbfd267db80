//! Core domain types and algorithms for group attraction voting.
//!
//! Members rank a fixed [`Catalog`] of theme-park attractions. The
//! [`RankAggregator`] folds every [`UserRanking`] into one
//! [`ConsolidatedRanking`], and the [`ItineraryPlanner`] turns its top slice
//! into a walking order with help from an external [`ItineraryOptimiser`].
//!
//! Storage and the reasoning service are traits; concrete implementations
//! live in `ridevote-data`. Nothing in this crate performs I/O.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod attraction;
pub mod catalog;
pub mod itinerary;
pub mod ranking;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use aggregate::{
    AbsencePolicy, ConsolidatedRanking, RankAggregator, RankedAttraction, Score, TopPick,
};
pub use attraction::{
    Attraction, AttractionDetails, AttractionError, AttractionId, Intensity, Land, MAP_EXTENT, Park,
};
pub use catalog::{AppBranding, AttractionOverride, Catalog, CatalogError};
pub use itinerary::{
    DEFAULT_TOP_K, Direction, ItineraryOptimiser, ItineraryPath, ItineraryPlanner,
    ItineraryRequest, ItineraryStop, OptimiseError, PathSource, PermutationError,
    TraversalConstraints, validate_permutation,
};
pub use ranking::{RankingDraft, RankingError, UserName, UserRanking, now_ms};
pub use session::{Member, Role, Roster, Session, SessionError, Turnout};
pub use store::{
    DisplayStore, MemoryRankingStore, Publication, RankingFeed, RankingListener, RankingStore, ResetReport,
    StoreError, Subscription,
};
