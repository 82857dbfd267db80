//! The `itinerary` command: plan a walking order for the group favourites.

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ridevote_core::{
    DEFAULT_TOP_K, Direction, ItineraryOptimiser, ItineraryPath, ItineraryPlanner, PathSource,
    RankAggregator, RankingStore, TraversalConstraints,
};
use ridevote_data::reasoning::{HttpItineraryOptimiser, HttpItineraryOptimiserConfig};
use serde::{Deserialize, Serialize};

use crate::workspace::{self, Workspace};
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_DATA_DIR, ARG_DIRECTION, ARG_MODEL, ARG_TIMEOUT_SECS, ARG_TOP,
    CliError, ENV_ITINERARY_API_KEY,
};

/// CLI arguments for the `itinerary` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "itinerary",
    long_about = "Ask the reasoning service for a walking order over the top \
                 of the group ranking. When the service fails or answers \
                 with anything but a reordering of the requested \
                 attractions, the ranking order is printed instead.",
    about = "Plan a walking order for the group's favourites"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct ItineraryArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// API key for the reasoning service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Service root (defaults to the public Gemini endpoint).
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Model name to call.
    #[arg(long = ARG_MODEL, value_name = "model")]
    #[serde(default)]
    pub(crate) model: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Number of top-ranked attractions to plan.
    #[arg(long = ARG_TOP, value_name = "n")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
    /// Loop direction around the hub: `clockwise` or `counterclockwise`.
    #[arg(long = ARG_DIRECTION, value_name = "direction")]
    #[serde(default)]
    pub(crate) direction: Option<String>,
}

impl ItineraryArgs {
    pub(crate) fn into_config(self) -> Result<ItineraryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ItineraryConfig::try_from(merged)
    }
}

/// Resolved `itinerary` configuration.
#[derive(Debug, Clone)]
pub(crate) struct ItineraryConfig {
    pub(crate) workspace: Workspace,
    pub(crate) optimiser: HttpItineraryOptimiserConfig,
    pub(crate) top_k: usize,
    pub(crate) constraints: TraversalConstraints,
}

impl TryFrom<ItineraryArgs> for ItineraryConfig {
    type Error = CliError;

    fn try_from(args: ItineraryArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_API_KEY,
                env: ENV_ITINERARY_API_KEY,
            })?;
        let top_k = args.top.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_TOP,
                message: "must plan at least one attraction".to_owned(),
            });
        }
        let direction: Direction = args
            .direction
            .as_deref()
            .map_or_else(|| Ok(Direction::default()), str::parse)
            .map_err(|message| CliError::InvalidArgument {
                field: ARG_DIRECTION,
                message,
            })?;

        let mut optimiser = HttpItineraryOptimiserConfig::new(api_key);
        if let Some(base_url) = args.base_url {
            optimiser = optimiser.with_base_url(base_url);
        }
        if let Some(model) = args.model {
            optimiser = optimiser.with_model(model);
        }
        if let Some(secs) = args.timeout_secs {
            if secs == 0 {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    message: "timeout must be positive".to_owned(),
                });
            }
            optimiser = optimiser.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            workspace: Workspace::new(args.data_dir),
            optimiser,
            top_k,
            constraints: TraversalConstraints {
                direction,
                ..TraversalConstraints::default()
            },
        })
    }
}

/// Builds the reasoning-service client for the current invocation.
pub(crate) trait OptimiserBuilder {
    fn build(
        &self,
        config: &HttpItineraryOptimiserConfig,
    ) -> Result<Box<dyn ItineraryOptimiser>, CliError>;
}

pub(crate) struct HttpOptimiserBuilder;

impl OptimiserBuilder for HttpOptimiserBuilder {
    fn build(
        &self,
        config: &HttpItineraryOptimiserConfig,
    ) -> Result<Box<dyn ItineraryOptimiser>, CliError> {
        let optimiser = HttpItineraryOptimiser::with_config(config.clone()).map_err(|source| {
            CliError::BuildOptimiser {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(optimiser))
    }
}

pub(crate) fn run_itinerary(
    args: ItineraryArgs,
    builder: &dyn OptimiserBuilder,
) -> Result<Vec<String>, CliError> {
    let config = args.into_config()?;
    let store = config.workspace.open_store()?;
    let catalog = workspace::catalog(&store)?;
    let rankings = store.all_rankings()?;
    if rankings.is_empty() {
        return Ok(vec!["No rankings yet.".to_owned()]);
    }
    let consolidated = RankAggregator::default().aggregate(&catalog, &rankings);

    let planner = ItineraryPlanner::new(builder.build(&config.optimiser)?)
        .with_top_k(config.top_k)
        .with_constraints(config.constraints);
    let path = planner.plan_ranking(&consolidated);
    Ok(render_path(&path))
}

fn render_path(path: &ItineraryPath) -> Vec<String> {
    let header = match path.source() {
        PathSource::Optimised => format!("Walking order for {} attractions:", path.len()),
        PathSource::Fallback => format!(
            "Ranking order for {} attractions (no optimised path available):",
            path.len()
        ),
    };
    let mut lines = vec![header];
    lines.extend(
        path.stops()
            .iter()
            .enumerate()
            .map(|(index, stop)| format!("{}. {} ({})", index + 1, stop.name, stop.land)),
    );
    lines
}
