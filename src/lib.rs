//! Facade crate for ridevote, the group attraction-ranking engine.
//!
//! This crate re-exports the core domain types and exposes the SQLite store
//! and the HTTP reasoning client behind feature flags.

#![forbid(unsafe_code)]

pub use ridevote_core::{
    AbsencePolicy, AppBranding, Attraction, AttractionDetails, AttractionError, AttractionId,
    AttractionOverride, Catalog, CatalogError, ConsolidatedRanking, DEFAULT_TOP_K, Direction,
    DisplayStore, Intensity, ItineraryOptimiser, ItineraryPath, ItineraryPlanner,
    ItineraryRequest, ItineraryStop, Land, MAP_EXTENT, Member, MemoryRankingStore,
    OptimiseError, Park, PathSource, PermutationError, Publication, RankAggregator,
    RankedAttraction, RankingDraft, RankingError, RankingFeed, RankingListener, RankingStore,
    ResetReport, Role, Roster, Score, Session, SessionError, StoreError, Subscription, TopPick,
    TraversalConstraints, Turnout, UserName, UserRanking, now_ms, validate_permutation,
};

#[cfg(feature = "store-sqlite")]
pub use ridevote_data::{SessionFile, SessionFileError, SqliteRankingStore, SqliteStoreError};

#[cfg(feature = "reasoning-http")]
pub use ridevote_data::{
    ClientBuildError, HttpItineraryOptimiser, HttpItineraryOptimiserConfig,
};
