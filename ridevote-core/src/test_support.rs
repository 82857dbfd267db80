//! Fixtures and stub collaborators shared by unit and behaviour tests.
//!
//! The helpers panic on invalid literals; they are meant for test setup
//! where failing fast is the desired outcome.
#![expect(clippy::expect_used, reason = "fixtures should fail fast during setup")]

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;

use crate::{
    Attraction, AttractionId, Catalog, Intensity, ItineraryOptimiser, ItineraryRequest, Land,
    OptimiseError, UserName, UserRanking,
};

/// Parse a list of raw identifiers.
pub fn ids(raw: &[&str]) -> Vec<AttractionId> {
    raw.iter()
        .map(|id| AttractionId::new(*id).expect("fixture id must not be blank"))
        .collect()
}

/// Calm attraction in `land` at a fixed map position.
pub fn attraction(id: &str, land: Land) -> Attraction {
    Attraction::new(
        AttractionId::new(id).expect("fixture id must not be blank"),
        format!("Ride {id}"),
        land,
        Intensity::Calm,
        Coord { x: 50.0, y: 50.0 },
    )
    .expect("fixture attraction must be valid")
}

/// Catalog of placeholder attractions in the given order.
pub fn catalog_of(raw: &[&str]) -> Catalog {
    Catalog::new(
        raw.iter()
            .map(|id| attraction(id, Land::Fantasyland))
            .collect(),
    )
    .expect("fixture ids must be unique")
}

/// Ranking submitted by `user` at time zero.
pub fn ranking(user: &str, order: &[&str]) -> UserRanking {
    UserRanking::new(
        UserName::new(user).expect("fixture user must not be blank"),
        ids(order),
        0,
    )
    .expect("fixture ranking must not repeat ids")
}

#[derive(Debug, Clone)]
enum Reply {
    Path(Vec<AttractionId>),
    Reverse,
    Fail(OptimiseError),
}

/// Scripted [`ItineraryOptimiser`] that counts how often it is called.
#[derive(Debug)]
pub struct StubOptimiser {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubOptimiser {
    /// Always answer with `path`.
    pub const fn with_path(path: Vec<AttractionId>) -> Self {
        Self::new(Reply::Path(path))
    }

    /// Answer with the request ids in reverse order.
    pub const fn reversing() -> Self {
        Self::new(Reply::Reverse)
    }

    /// Always fail with `error`.
    pub const fn with_error(error: OptimiseError) -> Self {
        Self::new(Reply::Fail(error))
    }

    const fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of optimisation requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ItineraryOptimiser for StubOptimiser {
    fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Path(path) => Ok(path.clone()),
            Reply::Reverse => Ok(request.ids().into_iter().rev().collect()),
            Reply::Fail(error) => Err(error.clone()),
        }
    }
}
