//! Error types emitted by the ridevote CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use ridevote_core::{RankingError, SessionError, StoreError};
use ridevote_data::reasoning::ClientBuildError;
use ridevote_data::{SessionFileError, SqliteStoreError};
use thiserror::Error;

/// Errors emitted by the ridevote CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// An option holds a value the command cannot use.
    #[error("invalid {field}: {message}")]
    InvalidArgument {
        /// Option name without the leading dashes.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
    /// The command needs a logged-in member.
    #[error("nobody is logged in (run `ridevote login <name>` first)")]
    NotLoggedIn,
    /// A destructive command ran without confirmation.
    #[error("{action} needs confirmation (pass --yes)")]
    ConfirmationRequired {
        /// Command that was refused.
        action: &'static str,
    },
    /// The display name is blank.
    #[error("invalid display name: {0}")]
    InvalidUserName(#[source] RankingError),
    /// A roster or privilege check failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Reading or writing the local session marker failed.
    #[error(transparent)]
    SessionFile(#[from] SessionFileError),
    /// Reading the roster file failed.
    #[error("failed to read roster at {path:?}: {source}")]
    ReadRoster {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The roster file is not a valid roster document.
    #[error("roster at {path:?} is invalid: {source}")]
    InvalidRoster {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: SessionError,
    },
    /// Reading the ranking file failed.
    #[error("failed to read ranking at {path:?}: {source}")]
    ReadRanking {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// The ranking file is not a JSON array of attraction ids.
    #[error("failed to parse ranking JSON at {path:?}: {source}")]
    ParseRanking {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// The submitted ranking is not a complete vote.
    #[error("ranking rejected: {0}")]
    InvalidRanking(#[source] RankingError),
    /// Opening the ranking database failed.
    #[error("failed to open ranking store at {path:?}: {source}")]
    OpenStore {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: SqliteStoreError,
    },
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Constructing the reasoning-service client failed.
    #[error("failed to build reasoning client for {base_url:?}: {source}")]
    BuildOptimiser {
        /// Configured service root.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ClientBuildError,
    },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
