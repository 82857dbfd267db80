//! Reasoning-service clients implementing [`ridevote_core::ItineraryOptimiser`].

pub mod gemini;
mod provider;

pub use provider::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_USER_AGENT, HttpItineraryOptimiser,
    HttpItineraryOptimiserConfig,
};
