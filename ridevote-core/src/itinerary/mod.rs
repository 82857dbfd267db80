//! Suggested visiting order for the group's favourite attractions.
//!
//! The spatial reasoning is delegated to an [`ItineraryOptimiser`], normally
//! a remote language model. [`ItineraryPlanner`] wraps it with the parts that
//! must be exact: answers are checked to be a permutation of the request,
//! failures fall back to ranking order, and results are cached per id set.

mod optimiser;
mod planner;
mod request;
mod validate;

pub use optimiser::{ItineraryOptimiser, OptimiseError};
pub use planner::{DEFAULT_TOP_K, ItineraryPath, ItineraryPlanner, PathSource};
pub use request::{Direction, ItineraryRequest, ItineraryStop, TraversalConstraints};
pub use validate::{PermutationError, validate_permutation};
