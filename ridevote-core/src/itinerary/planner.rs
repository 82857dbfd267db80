//! Cached itinerary planning with identity-order fallback.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::{Attraction, AttractionId, ConsolidatedRanking};

use super::{
    ItineraryOptimiser, ItineraryRequest, ItineraryStop, OptimiseError, PermutationError,
    TraversalConstraints, validate_permutation,
};

/// Number of consolidated attractions planned by default.
pub const DEFAULT_TOP_K: usize = 15;

/// Where an [`ItineraryPath`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// The reasoning service supplied a valid reordering.
    Optimised,
    /// The input order was kept because optimisation was unavailable.
    Fallback,
}

/// Recommended visiting order over the planned attractions.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryPath {
    stops: Vec<ItineraryStop>,
    source: PathSource,
}

impl ItineraryPath {
    /// Stops in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[ItineraryStop] {
        &self.stops
    }

    /// Ids in visiting order.
    #[must_use]
    pub fn ids(&self) -> Vec<AttractionId> {
        self.stops.iter().map(|stop| stop.id.clone()).collect()
    }

    /// How the order was produced.
    #[must_use]
    pub const fn source(&self) -> PathSource {
        self.source
    }

    /// Report whether the identity fallback was used.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == PathSource::Fallback
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Report whether there are no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[derive(Debug)]
struct CachedPath {
    key: HashSet<AttractionId>,
    path: ItineraryPath,
}

/// Why the optimiser's answer was discarded.
#[derive(Debug)]
enum Rejection {
    Call(OptimiseError),
    NotPermutation(PermutationError),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call(err) => write!(f, "{err}"),
            Self::NotPermutation(err) => write!(f, "answer rejected: {err}"),
        }
    }
}

/// Plans a walking order for the top of the consolidated ranking.
///
/// The planner never fails. Any optimiser error, and any answer that is not
/// a permutation of the requested ids, yields the input order with
/// [`PathSource::Fallback`]. The last result is cached against the set of
/// planned ids, so repeated calls with the same set do not reach the
/// optimiser again; a different set replaces the cache entry. A cached
/// fallback follows the order of each new request, since it carries no
/// order of its own.
///
/// # Examples
///
/// ```
/// use ridevote_core::{
///     AttractionId, Catalog, ItineraryOptimiser, ItineraryPlanner, ItineraryRequest,
///     OptimiseError, PathSource, RankAggregator,
/// };
///
/// struct Offline;
///
/// impl ItineraryOptimiser for Offline {
///     fn optimise(&self, _: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
///         Err(OptimiseError::EmptyResponse)
///     }
/// }
///
/// let catalog = Catalog::builtin();
/// let ranking = RankAggregator::default().aggregate(&catalog, &[]);
/// let planner = ItineraryPlanner::new(Offline);
/// let path = planner.plan_ranking(&ranking);
///
/// assert_eq!(path.source(), PathSource::Fallback);
/// assert_eq!(path.ids(), ranking.ids()[..15].to_vec());
/// ```
#[derive(Debug)]
pub struct ItineraryPlanner<O> {
    optimiser: O,
    top_k: usize,
    constraints: TraversalConstraints,
    cache: Mutex<Option<CachedPath>>,
}

impl<O: ItineraryOptimiser> ItineraryPlanner<O> {
    /// Create a planner with the default top-K and constraints.
    pub fn new(optimiser: O) -> Self {
        Self {
            optimiser,
            top_k: DEFAULT_TOP_K,
            constraints: TraversalConstraints::default(),
            cache: Mutex::new(None),
        }
    }

    /// Plan at most `top_k` attractions.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Use `constraints` for every request.
    #[must_use]
    pub fn with_constraints(mut self, constraints: TraversalConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Configured number of planned attractions.
    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Constraints sent with every request.
    #[must_use]
    pub const fn constraints(&self) -> &TraversalConstraints {
        &self.constraints
    }

    /// Borrow the underlying optimiser.
    #[must_use]
    pub const fn optimiser(&self) -> &O {
        &self.optimiser
    }

    /// Plan the top of `ranking`.
    pub fn plan_ranking(&self, ranking: &ConsolidatedRanking) -> ItineraryPath {
        self.plan(&ranking.top_attractions(self.top_k))
    }

    /// Plan the first `top_k` of `attractions`, given most preferred first.
    ///
    /// An empty list returns an empty fallback path without contacting the
    /// optimiser.
    pub fn plan(&self, attractions: &[Attraction]) -> ItineraryPath {
        let selected = attractions.get(..self.top_k).unwrap_or(attractions);
        let request = ItineraryRequest::from_attractions(selected, self.constraints);
        if request.is_empty() {
            return ItineraryPath {
                stops: Vec::new(),
                source: PathSource::Fallback,
            };
        }

        let key: HashSet<AttractionId> = request.ids().into_iter().collect();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref().filter(|cached| cached.key == key) {
            log::debug!("reusing cached itinerary for {} attractions", key.len());
            if cached.path.is_fallback() {
                return ItineraryPath {
                    stops: request.stops().to_vec(),
                    source: PathSource::Fallback,
                };
            }
            return cached.path.clone();
        }

        let path = self.compute(&request);
        *cache = Some(CachedPath {
            key,
            path: path.clone(),
        });
        path
    }

    /// Drop the cached path so the next call reaches the optimiser.
    pub fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn compute(&self, request: &ItineraryRequest) -> ItineraryPath {
        match self.optimised_order(request) {
            Ok(stops) => ItineraryPath {
                stops,
                source: PathSource::Optimised,
            },
            Err(reason) => {
                log::warn!("itinerary optimisation unavailable, keeping ranking order: {reason}");
                ItineraryPath {
                    stops: request.stops().to_vec(),
                    source: PathSource::Fallback,
                }
            }
        }
    }

    fn optimised_order(&self, request: &ItineraryRequest) -> Result<Vec<ItineraryStop>, Rejection> {
        let answer = self.optimiser.optimise(request).map_err(Rejection::Call)?;
        validate_permutation(&request.ids(), &answer).map_err(Rejection::NotPermutation)?;
        Ok(answer
            .iter()
            .filter_map(|id| request.stops().iter().find(|stop| &stop.id == id))
            .cloned()
            .collect())
    }
}
