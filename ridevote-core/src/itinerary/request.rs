//! Input handed to the reasoning service: stops plus traversal constraints.

use std::str::FromStr;

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Attraction, AttractionId, Land};

/// Direction of the loop around Disneyland Park's lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Direction {
    /// Main Street, Discoveryland, Fantasyland, Adventureland, Frontierland.
    Clockwise,
    /// Main Street, Frontierland, Adventureland, Fantasyland, Discoveryland.
    #[default]
    Counterclockwise,
}

impl Direction {
    /// Lands of Disneyland Park in visiting order, entrance first.
    #[must_use]
    pub const fn land_order(self) -> [Land; 5] {
        match self {
            Self::Counterclockwise => [
                Land::MainStreet,
                Land::Frontierland,
                Land::Adventureland,
                Land::Fantasyland,
                Land::Discoveryland,
            ],
            Self::Clockwise => [
                Land::MainStreet,
                Land::Discoveryland,
                Land::Fantasyland,
                Land::Adventureland,
                Land::Frontierland,
            ],
        }
    }

    /// Lowercase label used in prompts and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clockwise => "clockwise",
            Self::Counterclockwise => "counterclockwise",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clockwise" | "cw" => Ok(Self::Clockwise),
            "counterclockwise" | "anticlockwise" | "ccw" => Ok(Self::Counterclockwise),
            _ => Err(format!("unknown direction '{s}'")),
        }
    }
}

/// Walking rules the optimised order should respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TraversalConstraints {
    /// Land the walk starts from.
    pub entry_land: Land,
    /// Loop direction around the hub.
    pub direction: Direction,
    /// Keep attractions of one land contiguous.
    pub group_by_land: bool,
    /// Never return to a land once it has been left.
    pub no_revisit: bool,
}

impl Default for TraversalConstraints {
    fn default() -> Self {
        Self {
            entry_land: Land::MainStreet,
            direction: Direction::default(),
            group_by_land: true,
            no_revisit: true,
        }
    }
}

/// One attraction as the reasoning service sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryStop {
    /// Attraction identifier.
    pub id: AttractionId,
    /// Display name, included for the model's benefit.
    pub name: String,
    /// Land used for grouping.
    pub land: Land,
    /// Map position in the 0..=100 plane.
    pub location: Coord<f64>,
}

impl From<&Attraction> for ItineraryStop {
    fn from(attraction: &Attraction) -> Self {
        Self {
            id: attraction.id.clone(),
            name: attraction.name.clone(),
            land: attraction.land,
            location: attraction.location,
        }
    }
}

/// Ordered stops and the constraints to plan them under.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryRequest {
    stops: Vec<ItineraryStop>,
    constraints: TraversalConstraints,
}

impl ItineraryRequest {
    /// Build a request from stops in consolidated order.
    #[must_use]
    pub const fn new(stops: Vec<ItineraryStop>, constraints: TraversalConstraints) -> Self {
        Self { stops, constraints }
    }

    /// Build a request from catalog attractions.
    #[must_use]
    pub fn from_attractions(attractions: &[Attraction], constraints: TraversalConstraints) -> Self {
        Self::new(attractions.iter().map(ItineraryStop::from).collect(), constraints)
    }

    /// Stops in input order.
    #[must_use]
    pub fn stops(&self) -> &[ItineraryStop] {
        &self.stops
    }

    /// Constraints attached to the request.
    #[must_use]
    pub const fn constraints(&self) -> &TraversalConstraints {
        &self.constraints
    }

    /// Stop ids in input order.
    #[must_use]
    pub fn ids(&self) -> Vec<AttractionId> {
        self.stops.iter().map(|stop| stop.id.clone()).collect()
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Report whether the request has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Render the natural-language instruction sent to the reasoning service.
    #[must_use]
    pub fn prompt(&self) -> String {
        let constraints = &self.constraints;
        let loop_order = constraints
            .direction
            .land_order()
            .iter()
            .map(|land| land.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");

        let mut prompt = String::from(
            "You are a Disneyland Paris logistics expert.\n\
             Below are the group's top voted attractions for Disneyland Park.\n\
             Order them into an efficient walking path.\n\nConsider:\n",
        );
        let mut rules = vec![
            format!("Start from {} (the entrance).", constraints.entry_land.as_str()),
            format!(
                "Walk the lands {} in this loop: {loop_order}.",
                constraints.direction.as_str()
            ),
        ];
        if constraints.group_by_land {
            rules.push("Group attractions by land to avoid zig-zagging across the park.".to_owned());
        }
        if constraints.no_revisit {
            rules.push("Do not return to a land after leaving it.".to_owned());
        }
        rules.push("Use every listed ID exactly once and add no other IDs.".to_owned());
        for (number, rule) in rules.iter().enumerate() {
            prompt.push_str(&format!("{}. {rule}\n", number + 1));
        }

        prompt.push_str("\nAttractions:\n");
        for stop in &self.stops {
            prompt.push_str(&format!(
                "- {} (ID: {}, Land: {}, Coords: [{}, {}])\n",
                stop.name,
                stop.id,
                stop.land.as_str(),
                stop.location.x,
                stop.location.y
            ));
        }
        prompt.push_str("\nReturn the result strictly as JSON containing only the optimised path.");
        prompt
    }
}
