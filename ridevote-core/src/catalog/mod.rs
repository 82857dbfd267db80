//! The ordered attraction catalog and its display overrides.
//!
//! Catalog order matters: aggregation breaks score ties by declaration order,
//! and a fresh ranking draft starts out in catalog order.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Attraction, AttractionId};

mod builtin;

/// Errors returned by [`Catalog::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No attractions were supplied.
    #[error("catalog must contain at least one attraction")]
    Empty,
    /// Two attractions shared an identifier.
    #[error("attraction id {id} appears more than once")]
    DuplicateId {
        /// The repeated identifier.
        id: AttractionId,
    },
}

/// Immutable, ordered set of attractions with unique ids.
///
/// # Examples
/// ```
/// use ridevote_core::{AttractionId, Catalog};
///
/// let catalog = Catalog::builtin();
/// let first = AttractionId::new("dlp_1")?;
/// assert_eq!(catalog.position(&first), Some(0));
/// assert_eq!(catalog.get(&first).map(|a| a.name.as_str()), Some("Disneyland Railroad"));
/// # Ok::<(), ridevote_core::AttractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    attractions: Vec<Attraction>,
    index: HashMap<AttractionId, usize>,
}

impl Catalog {
    /// Validate and construct a catalog, preserving the given order.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::DuplicateId`] when an id repeats.
    pub fn new(attractions: Vec<Attraction>) -> Result<Self, CatalogError> {
        if attractions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut index = HashMap::with_capacity(attractions.len());
        for (position, attraction) in attractions.iter().enumerate() {
            if index.insert(attraction.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: attraction.id.clone(),
                });
            }
        }
        Ok(Self { attractions, index })
    }

    /// The Disneyland Park catalog bundled with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let attractions = builtin::attractions();
        let index = attractions
            .iter()
            .enumerate()
            .map(|(position, attraction)| (attraction.id.clone(), position))
            .collect();
        Self { attractions, index }
    }

    /// Look up an attraction by id.
    #[must_use]
    pub fn get(&self, id: &AttractionId) -> Option<&Attraction> {
        self.position(id)
            .and_then(|position| self.attractions.get(position))
    }

    /// Report whether `id` belongs to the catalog.
    #[must_use]
    pub fn contains(&self, id: &AttractionId) -> bool {
        self.index.contains_key(id)
    }

    /// Zero-based declaration position of `id`.
    #[must_use]
    pub fn position(&self, id: &AttractionId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Iterate attractions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Attraction> {
        self.attractions.iter()
    }

    /// Identifiers in declaration order.
    #[must_use]
    pub fn ids(&self) -> Vec<AttractionId> {
        self.attractions.iter().map(|a| a.id.clone()).collect()
    }

    /// Borrow the attractions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Attraction] {
        &self.attractions
    }

    /// Number of attractions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attractions.len()
    }

    /// Always `false` for a validated catalog; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    /// Return a copy with display metadata replaced by `overrides`.
    ///
    /// Only image and video links change. Ids, coordinates, land and
    /// intensity are left untouched, and overrides naming unknown ids are
    /// skipped.
    #[must_use]
    pub fn with_overrides(&self, overrides: &[AttractionOverride]) -> Self {
        let mut patched = self.clone();
        for entry in overrides {
            let Some(position) = patched.position(&entry.attraction_id) else {
                log::debug!(
                    "ignoring display override for unknown attraction {}",
                    entry.attraction_id
                );
                continue;
            };
            if let Some(attraction) = patched.attractions.get_mut(position) {
                entry.apply(attraction);
            }
        }
        patched
    }

    /// Collect the ids in `ids` that the catalog does not know.
    #[must_use]
    pub fn unknown_ids<'a, I>(&self, ids: I) -> Vec<AttractionId>
    where
        I: IntoIterator<Item = &'a AttractionId>,
    {
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| !self.contains(id) && seen.insert(*id))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Attraction;
    type IntoIter = std::slice::Iter<'a, Attraction>;

    fn into_iter(self) -> Self::IntoIter {
        self.attractions.iter()
    }
}

/// Admin-supplied display metadata for one attraction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttractionOverride {
    /// Attraction the override applies to.
    pub attraction_id: AttractionId,
    /// Replacement card picture.
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: Option<String>,
    /// Replacement ride-through video.
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_url: Option<String>,
}

impl AttractionOverride {
    /// Build an override that only replaces the card picture.
    #[must_use]
    pub fn image(attraction_id: AttractionId, image_url: impl Into<String>) -> Self {
        Self {
            attraction_id,
            image_url: Some(image_url.into()),
            video_url: None,
        }
    }

    fn apply(&self, attraction: &mut Attraction) {
        if let Some(url) = &self.image_url {
            attraction.details.image_url = Some(url.clone());
        }
        if let Some(url) = &self.video_url {
            attraction.details.video_url = Some(url.clone());
        }
    }
}

/// Application name and icon shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppBranding {
    /// Display name of the app.
    pub app_name: String,
    /// Icon link; `None` uses the bundled icon.
    #[cfg_attr(feature = "serde", serde(default))]
    pub app_icon_url: Option<String>,
}

impl Default for AppBranding {
    fn default() -> Self {
        Self {
            app_name: "Team Disney".to_owned(),
            app_icon_url: None,
        }
    }
}
