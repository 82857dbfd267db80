//! Session and ballot commands: `login`, `logout`, `whoami` and `submit`.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use ridevote_core::{AttractionId, RankingStore, UserRanking, now_ms};
use ridevote_data::fs;
use serde::{Deserialize, Serialize};

use crate::workspace::{self, Workspace};
use crate::{
    ARG_DATA_DIR, ARG_NAME, ARG_RANKING, ARG_ROSTER, CliError, ENV_LOGIN_NAME, ENV_SUBMIT_RANKING,
};

/// CLI arguments for the `login` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "login",
    long_about = "Start a session under a display name. With a roster the \
                 name must be listed there and the roster decides the role; \
                 without one anybody may join as an ordinary member.",
    about = "Start a session under a display name"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct LoginArgs {
    /// Display name to log in as.
    #[arg(value_name = ARG_NAME)]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
}

impl LoginArgs {
    pub(crate) fn into_config(self) -> Result<LoginConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoginConfig::try_from(merged)
    }
}

/// Resolved `login` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoginConfig {
    pub(crate) name: String,
    pub(crate) workspace: Workspace,
    pub(crate) roster: Option<Utf8PathBuf>,
}

impl TryFrom<LoginArgs> for LoginConfig {
    type Error = CliError;

    fn try_from(args: LoginArgs) -> Result<Self, Self::Error> {
        let name = args
            .name
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_NAME,
                env: ENV_LOGIN_NAME,
            })?;
        Ok(Self {
            name,
            workspace: Workspace::new(args.data_dir),
            roster: args.roster,
        })
    }
}

pub(crate) fn run_login(args: LoginArgs) -> Result<Vec<String>, CliError> {
    let config = args.into_config()?;
    let roster = workspace::load_roster(config.roster.as_deref())?;
    let session = workspace::resolve_session(&config.name, roster.as_ref())?;
    let store = config.workspace.open_store()?;
    let existing = store.get_ranking(session.name())?;
    config.workspace.session_file().save(session.name())?;
    log::info!("{} logged in as {}", session.name(), session.role());

    let mut lines = vec![format!("Logged in as {} ({}).", session.name(), session.role())];
    lines.push(existing.map_or_else(
        || "No ranking submitted yet.".to_owned(),
        |ranking| {
            format!(
                "Your ranking of {} attraction(s) is on file.",
                ranking.attraction_ids().len()
            )
        },
    ));
    Ok(lines)
}

/// CLI arguments for the `logout` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "logout", about = "End the local session")]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct LogoutArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

pub(crate) fn run_logout(args: &LogoutArgs) -> Result<Vec<String>, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let workspace = Workspace::new(merged.data_dir);
    let line = if workspace.session_file().clear()? {
        "Logged out."
    } else {
        "Nobody was logged in."
    };
    Ok(vec![line.to_owned()])
}

/// CLI arguments for the `whoami` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "whoami", about = "Show who is logged in")]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct WhoamiArgs {
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
}

pub(crate) fn run_whoami(args: &WhoamiArgs) -> Result<Vec<String>, CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let workspace = Workspace::new(merged.data_dir);
    let roster = workspace::load_roster(merged.roster.as_deref())?;
    let session = workspace.require_session(roster.as_ref())?;
    Ok(vec![format!("{} ({})", session.name(), session.role())])
}

/// CLI arguments for the `submit` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "submit",
    long_about = "Submit or replace your ranking. The file holds a JSON array \
                 of attraction ids, most preferred first, covering every \
                 attraction in the catalog exactly once.",
    about = "Submit or replace your ranking from a JSON file"
)]
#[ortho_config(prefix = "RIDEVOTE")]
pub(crate) struct SubmitArgs {
    /// Path to a JSON array of attraction ids.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) ranking_path: Option<Utf8PathBuf>,
    /// Directory holding the ranking database and session marker.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// JSON roster listing members and their roles.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
}

impl SubmitArgs {
    pub(crate) fn into_config(self) -> Result<SubmitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SubmitConfig::try_from(merged)
    }
}

/// Resolved `submit` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmitConfig {
    pub(crate) ranking_path: Utf8PathBuf,
    pub(crate) workspace: Workspace,
    pub(crate) roster: Option<Utf8PathBuf>,
}

impl TryFrom<SubmitArgs> for SubmitConfig {
    type Error = CliError;

    fn try_from(args: SubmitArgs) -> Result<Self, Self::Error> {
        let ranking_path = args.ranking_path.ok_or(CliError::MissingArgument {
            field: ARG_RANKING,
            env: ENV_SUBMIT_RANKING,
        })?;
        Ok(Self {
            ranking_path,
            workspace: Workspace::new(args.data_dir),
            roster: args.roster,
        })
    }
}

pub(crate) fn run_submit(args: SubmitArgs) -> Result<Vec<String>, CliError> {
    let config = args.into_config()?;
    let roster = workspace::load_roster(config.roster.as_deref())?;
    let session = config.workspace.require_session(roster.as_ref())?;
    let ids = load_ranking_ids(&config.ranking_path)?;

    let store = config.workspace.open_store()?;
    let catalog = workspace::catalog(&store)?;
    let ranking = UserRanking::new(session.name().clone(), ids, now_ms())
        .map_err(CliError::InvalidRanking)?;
    ranking
        .ensure_complete(&catalog)
        .map_err(CliError::InvalidRanking)?;
    let first = ranking
        .first_choice()
        .and_then(|id| catalog.get(id))
        .map(|attraction| attraction.name.clone());
    store.put_ranking(ranking)?;

    let mut lines = vec![format!(
        "Saved ranking of {} attractions for {}.",
        catalog.len(),
        session.name()
    )];
    if let Some(name) = first {
        lines.push(format!("Top pick: {name}"));
    }
    Ok(lines)
}

/// Loads a JSON array of attraction ids from disk.
pub(crate) fn load_ranking_ids(path: &Utf8Path) -> Result<Vec<AttractionId>, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::ReadRanking {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| CliError::ParseRanking {
        path: path.to_path_buf(),
        source,
    })
}
