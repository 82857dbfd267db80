//! Reasoning-service trait and its error type.

use thiserror::Error;

use crate::AttractionId;

use super::ItineraryRequest;

/// Errors from [`ItineraryOptimiser::optimise`].
///
/// The planner treats every variant as non-fatal and falls back to the
/// input order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimiseError {
    /// The request carried no stops.
    #[error("at least one stop is required")]
    EmptyInput,
    /// The service could not be reached.
    #[error("network error calling {url}: {message}")]
    Network {
        /// Endpoint that was called, without credentials.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The call did not finish within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was called, without credentials.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Endpoint that was called, without credentials.
        url: String,
        /// Status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The service answered without any content.
    #[error("reasoning service returned an empty response")]
    EmptyResponse,
    /// The content could not be parsed as a path.
    #[error("malformed reasoning response: {message}")]
    MalformedResponse {
        /// Parser error description.
        message: String,
    },
    /// The service refused the request.
    #[error("reasoning service error: {message}")]
    Service {
        /// Reason reported by the service.
        message: String,
    },
}

/// Reorder a short list of attractions into a walking path.
///
/// Implementations return the ids of `request` in visiting order. They are
/// not trusted to return a permutation; [`crate::ItineraryPlanner`] checks
/// the answer before using it.
///
/// # Examples
///
/// ```
/// use ridevote_core::{AttractionId, ItineraryOptimiser, ItineraryRequest, OptimiseError};
///
/// struct KeepOrder;
///
/// impl ItineraryOptimiser for KeepOrder {
///     fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
///         if request.is_empty() {
///             return Err(OptimiseError::EmptyInput);
///         }
///         Ok(request.ids())
///     }
/// }
/// ```
pub trait ItineraryOptimiser: Send + Sync {
    /// Return the ids of `request` in the suggested visiting order.
    ///
    /// Implementations must return `Err(OptimiseError::EmptyInput)` when the
    /// request has no stops.
    fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError>;
}

impl<T: ItineraryOptimiser + ?Sized> ItineraryOptimiser for Box<T> {
    fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
        (**self).optimise(request)
    }
}

impl<T: ItineraryOptimiser + ?Sized> ItineraryOptimiser for std::sync::Arc<T> {
    fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
        (**self).optimise(request)
    }
}
