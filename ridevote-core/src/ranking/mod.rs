//! Individual rankings submitted by group members.
//!
//! A [`UserRanking`] is keyed by [`UserName`] and replaced wholesale on
//! every submission. Construction rejects repeated ids, so downstream
//! aggregation never sees a malformed record.

use std::collections::HashSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AttractionId, Catalog};

mod draft;

pub use draft::RankingDraft;

/// Display name identifying a group member.
///
/// Surrounding whitespace is trimmed; blank names are rejected.
///
/// # Examples
/// ```
/// use ridevote_core::UserName;
///
/// let name = UserName::new("  Camille ")?;
/// assert_eq!(name.as_str(), "Camille");
/// # Ok::<(), ridevote_core::RankingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct UserName(String);

impl UserName {
    /// Validate and wrap a display name.
    ///
    /// # Errors
    /// Returns [`RankingError::EmptyUserName`] for blank input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, RankingError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RankingError::EmptyUserName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = RankingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while building or checking rankings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// The user name was blank.
    #[error("user name must not be empty")]
    EmptyUserName,
    /// The same attraction appeared twice in one ranking.
    #[error("attraction {id} is ranked more than once")]
    DuplicateAttraction {
        /// The repeated identifier.
        id: AttractionId,
    },
    /// The ranking named attractions the catalog does not contain.
    #[error("ranking references {} unknown attraction(s)", ids.len())]
    UnknownAttractions {
        /// Identifiers missing from the catalog.
        ids: Vec<AttractionId>,
    },
    /// The ranking does not cover the whole catalog.
    #[error("ranking covers {ranked} of {expected} attractions")]
    Incomplete {
        /// Number of catalog ids present.
        ranked: usize,
        /// Catalog size.
        expected: usize,
    },
}

/// One member's ordered preferences, most preferred first.
///
/// # Examples
/// ```
/// use ridevote_core::{AttractionId, UserName, UserRanking};
///
/// let ids = vec![AttractionId::new("b")?, AttractionId::new("a")?];
/// let ranking = UserRanking::new(UserName::new("Leo")?, ids, 0)?;
/// assert_eq!(ranking.rank_of(&AttractionId::new("a")?), Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawUserRanking")
)]
pub struct UserRanking {
    user_name: UserName,
    attraction_ids: Vec<AttractionId>,
    updated_at_ms: u64,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawUserRanking {
    user_name: UserName,
    attraction_ids: Vec<AttractionId>,
    #[serde(default)]
    updated_at_ms: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawUserRanking> for UserRanking {
    type Error = RankingError;

    fn try_from(raw: RawUserRanking) -> Result<Self, Self::Error> {
        Self::new(raw.user_name, raw.attraction_ids, raw.updated_at_ms)
    }
}

impl UserRanking {
    /// Validate and construct a ranking.
    ///
    /// `updated_at_ms` is the submission time in milliseconds since the Unix
    /// epoch.
    ///
    /// # Errors
    /// Returns [`RankingError::DuplicateAttraction`] when an id repeats.
    pub fn new(
        user_name: UserName,
        attraction_ids: Vec<AttractionId>,
        updated_at_ms: u64,
    ) -> Result<Self, RankingError> {
        if let Some(id) = first_duplicate(&attraction_ids) {
            return Err(RankingError::DuplicateAttraction { id });
        }
        Ok(Self {
            user_name,
            attraction_ids,
            updated_at_ms,
        })
    }

    /// The member who submitted the ranking.
    #[must_use]
    pub const fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Ranked ids, most preferred first.
    #[must_use]
    pub fn attraction_ids(&self) -> &[AttractionId] {
        &self.attraction_ids
    }

    /// Submission time in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn updated_at_ms(&self) -> u64 {
        self.updated_at_ms
    }

    /// One-based rank of `id`, or `None` when unranked.
    #[must_use]
    pub fn rank_of(&self, id: &AttractionId) -> Option<usize> {
        self.attraction_ids
            .iter()
            .position(|candidate| candidate == id)
            .map(|position| position + 1)
    }

    /// The member's first choice.
    #[must_use]
    pub fn first_choice(&self) -> Option<&AttractionId> {
        self.attraction_ids.first()
    }

    /// Check that every ranked id belongs to `catalog`.
    ///
    /// # Errors
    /// Returns [`RankingError::UnknownAttractions`] listing foreign ids.
    pub fn validate_against(&self, catalog: &Catalog) -> Result<(), RankingError> {
        let unknown = catalog.unknown_ids(&self.attraction_ids);
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(RankingError::UnknownAttractions { ids: unknown })
        }
    }

    /// Check that the ranking lists every catalog id exactly once.
    ///
    /// # Errors
    /// Returns [`RankingError::UnknownAttractions`] for foreign ids and
    /// [`RankingError::Incomplete`] when catalog ids are missing.
    pub fn ensure_complete(&self, catalog: &Catalog) -> Result<(), RankingError> {
        self.validate_against(catalog)?;
        if self.attraction_ids.len() == catalog.len() {
            Ok(())
        } else {
            Err(RankingError::Incomplete {
                ranked: self.attraction_ids.len(),
                expected: catalog.len(),
            })
        }
    }

    /// Report whether the ranking is a complete vote over `catalog`.
    #[must_use]
    pub fn is_complete(&self, catalog: &Catalog) -> bool {
        self.ensure_complete(catalog).is_ok()
    }
}

fn first_duplicate(ids: &[AttractionId]) -> Option<AttractionId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().find(|id| !seen.insert(*id)).cloned()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Clocks set before 1970 report zero.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
