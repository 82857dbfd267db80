//! Attractions: the static items a group ranks.
//!
//! Every attraction carries a stable [`AttractionId`], the [`Land`] it sits
//! in, an [`Intensity`] classification and a position on the park map. Map
//! coordinates live in a normalised `0..=100` plane with `x` growing east
//! and `y` growing south, so the park entrance sits near the bottom edge.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound of the normalised map plane.
pub const MAP_EXTENT: f64 = 100.0;

/// Opaque identifier for an attraction, unique within a catalog.
///
/// # Examples
/// ```
/// use ridevote_core::AttractionId;
///
/// let id = AttractionId::new("dlp_1")?;
/// assert_eq!(id.as_str(), "dlp_1");
/// assert!(AttractionId::new("  ").is_err());
/// # Ok::<(), ridevote_core::AttractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct AttractionId(pub(crate) String);

impl AttractionId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    /// Returns [`AttractionError::EmptyId`] when the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, AttractionError> {
        let raw = id.into();
        if raw.trim().is_empty() {
            return Err(AttractionError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AttractionId {
    type Error = AttractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttractionId> for String {
    fn from(id: AttractionId) -> Self {
        id.0
    }
}

impl fmt::Display for AttractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Theme park hosting an attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Park {
    /// The castle park.
    Disneyland,
    /// The studios park.
    Studios,
}

impl Park {
    /// Return the park's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disneyland => "Parc Disneyland",
            Self::Studios => "Walt Disney Studios",
        }
    }
}

impl fmt::Display for Park {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named area of a park. Itineraries group stops by land.
///
/// # Examples
/// ```
/// use ridevote_core::Land;
///
/// assert_eq!(Land::Frontierland.as_str(), "Frontierland");
/// assert_eq!("main street u.s.a.".parse::<Land>(), Ok(Land::MainStreet));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Land {
    /// Entrance street of the castle park.
    MainStreet,
    /// Wild west area.
    Frontierland,
    /// Jungle and pirates area.
    Adventureland,
    /// Fairy-tale area behind the castle.
    Fantasyland,
    /// Retro-futurist area.
    Discoveryland,
    /// Entrance area of the studios park.
    FrontLot,
    /// Studios courtyard.
    ProductionCourtyard,
    /// Marvel area.
    AvengersCampus,
    /// Animation area.
    ToonStudio,
    /// Pixar area.
    WorldsOfPixar,
}

impl Land {
    /// Every land in declaration order.
    pub const ALL: [Self; 10] = [
        Self::MainStreet,
        Self::Frontierland,
        Self::Adventureland,
        Self::Fantasyland,
        Self::Discoveryland,
        Self::FrontLot,
        Self::ProductionCourtyard,
        Self::AvengersCampus,
        Self::ToonStudio,
        Self::WorldsOfPixar,
    ];

    /// Return the land's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainStreet => "Main Street U.S.A.",
            Self::Frontierland => "Frontierland",
            Self::Adventureland => "Adventureland",
            Self::Fantasyland => "Fantasyland",
            Self::Discoveryland => "Discoveryland",
            Self::FrontLot => "Front Lot",
            Self::ProductionCourtyard => "Production Courtyard",
            Self::AvengersCampus => "Avengers Campus",
            Self::ToonStudio => "Toon Studio",
            Self::WorldsOfPixar => "Worlds of Pixar",
        }
    }

    /// Return the park a land belongs to.
    #[must_use]
    pub const fn park(self) -> Park {
        match self {
            Self::MainStreet
            | Self::Frontierland
            | Self::Adventureland
            | Self::Fantasyland
            | Self::Discoveryland => Park::Disneyland,
            Self::FrontLot
            | Self::ProductionCourtyard
            | Self::AvengersCampus
            | Self::ToonStudio
            | Self::WorldsOfPixar => Park::Studios,
        }
    }
}

impl fmt::Display for Land {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Land {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|land| land.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown land '{s}'"))
    }
}

/// How intense a ride feels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Intensity {
    /// Gentle rides and walk-throughs.
    Calm,
    /// Some drops or darkness.
    Moderate,
    /// Coasters and thrill rides.
    Thrill,
}

impl Intensity {
    /// Return the intensity as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Moderate => "moderate",
            Self::Thrill => "thrill",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Self::Calm),
            "moderate" => Ok(Self::Moderate),
            "thrill" => Ok(Self::Thrill),
            _ => Err(format!("unknown intensity '{s}'")),
        }
    }
}

/// Descriptive metadata. Never consulted by aggregation or planning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AttractionDetails {
    /// Short marketing description.
    pub description: String,
    /// Picture shown on the attraction card.
    pub image_url: Option<String>,
    /// Ride-through video.
    pub video_url: Option<String>,
    /// Official park page.
    pub official_url: Option<String>,
    /// One-paragraph summary of visitor reviews.
    pub review_summary: Option<String>,
    /// Typical queue length in minutes.
    pub avg_wait_minutes: Option<u16>,
    /// Ride length in minutes.
    pub duration_minutes: Option<u16>,
}

/// A catalog entry.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use ridevote_core::{Attraction, AttractionId, Intensity, Land};
///
/// let id = AttractionId::new("dlp_2")?;
/// let ride = Attraction::new(
///     id,
///     "Big Thunder Mountain",
///     Land::Frontierland,
///     Intensity::Thrill,
///     Coord { x: 20.0, y: 60.0 },
/// )?;
/// assert_eq!(ride.land, Land::Frontierland);
/// # Ok::<(), ridevote_core::AttractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attraction {
    /// Stable identifier.
    pub id: AttractionId,
    /// Display name.
    pub name: String,
    /// Park the attraction belongs to.
    pub park: Park,
    /// Area tag used for itinerary grouping.
    pub land: Land,
    /// Ride intensity.
    pub intensity: Intensity,
    /// Position on the normalised park map.
    pub location: Coord<f64>,
    /// Display-only metadata.
    #[cfg_attr(feature = "serde", serde(default))]
    pub details: AttractionDetails,
}

/// Errors returned when building attractions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttractionError {
    /// The identifier was empty or whitespace.
    #[error("attraction id must not be empty")]
    EmptyId,
    /// The display name was empty or whitespace.
    #[error("attraction {id} must have a name")]
    EmptyName {
        /// Identifier of the offending attraction.
        id: String,
    },
    /// A coordinate fell outside the `0..=100` map plane.
    #[error("attraction {id} lies outside the map plane")]
    OutOfBounds {
        /// Identifier of the offending attraction.
        id: String,
    },
}

impl Attraction {
    /// Validate and construct an attraction with empty details.
    ///
    /// The park is derived from the land.
    ///
    /// # Errors
    /// Returns [`AttractionError`] when the name is blank or the location is
    /// outside the normalised map plane.
    pub fn new(
        id: AttractionId,
        name: impl Into<String>,
        land: Land,
        intensity: Intensity,
        location: Coord<f64>,
    ) -> Result<Self, AttractionError> {
        let display_name: String = name.into();
        if display_name.trim().is_empty() {
            return Err(AttractionError::EmptyName {
                id: id.as_str().to_owned(),
            });
        }
        if !on_map(location) {
            return Err(AttractionError::OutOfBounds {
                id: id.as_str().to_owned(),
            });
        }
        Ok(Self {
            id,
            name: display_name,
            park: land.park(),
            land,
            intensity,
            location,
            details: AttractionDetails::default(),
        })
    }

    /// Attach display metadata, returning `self` for chaining.
    #[must_use]
    pub fn with_details(mut self, details: AttractionDetails) -> Self {
        self.details = details;
        self
    }
}

fn on_map(location: Coord<f64>) -> bool {
    let range = 0.0..=MAP_EXTENT;
    range.contains(&location.x) && range.contains(&location.y)
}
