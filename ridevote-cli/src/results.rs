//! The `results` command: consolidated ranking and turnout.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ridevote_core::{
    AbsencePolicy, AttractionId, ConsolidatedRanking, RankAggregator, RankingStore, UserName,
};
use serde::{Deserialize, Serialize};

use crate::workspace::{self, Workspace};
use crate::{ARG_DATA_DIR, ARG_POLICY, ARG_ROSTER, ARG_TOP, CliError};

/// CLI arguments for the `results` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "results",
    long_about = "Print the group ranking. Every ranking contributes its \
                 1-based positions; the lowest total ranks first. With a \
                 roster the command also lists who has not voted yet.",
    about = "Show the consolidated group ranking"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct ResultsArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// Scoring of unranked attractions: `neutral` or `penalised`.
    #[arg(long = ARG_POLICY, value_name = "policy")]
    #[serde(default)]
    pub(crate) policy: Option<String>,
    /// Only print the first N attractions.
    #[arg(long = ARG_TOP, value_name = "n")]
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

impl ResultsArgs {
    pub(crate) fn into_config(self) -> Result<ResultsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ResultsConfig::try_from(merged)
    }
}

/// Resolved `results` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultsConfig {
    pub(crate) workspace: Workspace,
    pub(crate) roster: Option<Utf8PathBuf>,
    pub(crate) policy: AbsencePolicy,
    pub(crate) top: Option<usize>,
}

impl TryFrom<ResultsArgs> for ResultsConfig {
    type Error = CliError;

    fn try_from(args: ResultsArgs) -> Result<Self, Self::Error> {
        let policy = args
            .policy
            .as_deref()
            .map_or_else(|| Ok(AbsencePolicy::default()), str::parse)
            .map_err(|message| CliError::InvalidArgument {
                field: ARG_POLICY,
                message,
            })?;
        Ok(Self {
            workspace: Workspace::new(args.data_dir),
            roster: args.roster,
            policy,
            top: args.top,
        })
    }
}

pub(crate) fn run_results(args: ResultsArgs) -> Result<Vec<String>, CliError> {
    let config = args.into_config()?;
    let roster = workspace::load_roster(config.roster.as_deref())?;
    let viewer = config.workspace.current_user()?;

    let store = config.workspace.open_store()?;
    let catalog = workspace::catalog(&store)?;
    let rankings = store.all_rankings()?;
    let consolidated = RankAggregator::new(config.policy).aggregate(&catalog, &rankings);
    let viewer_ranking = viewer
        .as_ref()
        .and_then(|name| rankings.iter().find(|ranking| ranking.user_name() == name));

    let mut lines = if consolidated.ballots() == 0 {
        vec!["No rankings yet.".to_owned()]
    } else {
        let limit = config.top.unwrap_or(consolidated.len());
        render_ranking(&consolidated, limit, |entry| {
            viewer_ranking.and_then(|ranking| ranking.rank_of(entry))
        })
    };

    if let Some(members) = roster {
        let turnout = members.turnout(&rankings);
        lines.push(format!(
            "Voted ({}): {}",
            turnout.voted.len(),
            join_names(&turnout.voted)
        ));
        lines.push(format!(
            "Waiting for ({}): {}",
            turnout.pending.len(),
            join_names(&turnout.pending)
        ));
    }
    Ok(lines)
}

/// One line per attraction: position, score, the members who put it first
/// and the viewer's own rank when known.
fn render_ranking<F>(consolidated: &ConsolidatedRanking, limit: usize, my_rank: F) -> Vec<String>
where
    F: Fn(&AttractionId) -> Option<usize>,
{
    let mut lines = vec![format!(
        "Group ranking from {} ballot(s):",
        consolidated.ballots()
    )];
    for (position, entry) in consolidated.top(limit).iter().enumerate() {
        let mut line = format!(
            "{}. {} ({}) - {} pts",
            position + 1,
            entry.attraction.name,
            entry.attraction.land,
            entry.score
        );
        if !entry.top_pick.voters.is_empty() {
            line.push_str(&format!(", top pick of {}", join_names(&entry.top_pick.voters)));
        }
        if let Some(rank) = my_rank(&entry.attraction.id) {
            line.push_str(&format!(", your rank #{rank}"));
        }
        lines.push(line);
    }
    lines
}

fn join_names(names: &[UserName]) -> String {
    if names.is_empty() {
        return "-".to_owned();
    }
    names
        .iter()
        .map(UserName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
