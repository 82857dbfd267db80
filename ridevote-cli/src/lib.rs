//! Command-line interface for ridevote groups.
//!
//! Every subcommand resolves its options through `ortho_config`, so values
//! can come from flags, `RIDEVOTE_CMDS_<COMMAND>_<FIELD>` environment
//! variables, or a configuration file. Rankings live in a SQLite database
//! inside the data directory next to the local session marker.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod admin;
mod error;
mod itinerary;
mod results;
mod vote;
mod workspace;

pub use error::CliError;

use admin::{BrandArgs, MediaArgs, ResetArgs};
use itinerary::{HttpOptimiserBuilder, ItineraryArgs, OptimiserBuilder};
use results::ResultsArgs;
use vote::{LoginArgs, LogoutArgs, SubmitArgs, WhoamiArgs};

const ARG_DATA_DIR: &str = "data-dir";
const ARG_ROSTER: &str = "roster";
const ARG_NAME: &str = "name";
const ARG_RANKING: &str = "ranking";
const ARG_POLICY: &str = "policy";
const ARG_TOP: &str = "top";
const ARG_API_KEY: &str = "api-key";
const ARG_BASE_URL: &str = "base-url";
const ARG_MODEL: &str = "model";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_DIRECTION: &str = "direction";
const ARG_APP_NAME: &str = "app-name";
const ARG_ICON_URL: &str = "icon-url";
const ARG_ATTRACTION: &str = "attraction";
const ARG_IMAGE_URL: &str = "image-url";
const ARG_VIDEO_URL: &str = "video-url";
const ARG_YES: &str = "yes";
const ENV_LOGIN_NAME: &str = "RIDEVOTE_CMDS_LOGIN_NAME";
const ENV_SUBMIT_RANKING: &str = "RIDEVOTE_CMDS_SUBMIT_RANKING_PATH";
const ENV_ITINERARY_API_KEY: &str = "RIDEVOTE_CMDS_ITINERARY_API_KEY";
const ENV_MEDIA_ATTRACTION: &str = "RIDEVOTE_CMDS_MEDIA_ATTRACTION";

/// Run the ridevote CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &HttpOptimiserBuilder, &mut stdout)
}

fn run_with(
    cli: Cli,
    builder: &dyn OptimiserBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let lines = match cli.command {
        Command::Login(args) => vote::run_login(args)?,
        Command::Logout(args) => vote::run_logout(&args)?,
        Command::Whoami(args) => vote::run_whoami(&args)?,
        Command::Submit(args) => vote::run_submit(args)?,
        Command::Results(args) => results::run_results(args)?,
        Command::Itinerary(args) => itinerary::run_itinerary(args, builder)?,
        Command::Reset(args) => admin::run_reset(&args)?,
        Command::Brand(args) => admin::run_brand(&args)?,
        Command::Media(args) => admin::run_media(&args)?,
    };
    write_lines(writer, &lines)
}

fn write_lines(writer: &mut dyn Write, lines: &[String]) -> Result<(), CliError> {
    for line in lines {
        writeln!(writer, "{line}").map_err(CliError::WriteOutput)?;
    }
    writer.flush().map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "ridevote",
    about = "Rank park attractions as a group and plan the walk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a session under a display name.
    Login(LoginArgs),
    /// End the local session.
    Logout(LogoutArgs),
    /// Show who is logged in.
    Whoami(WhoamiArgs),
    /// Submit or replace your ranking from a JSON file.
    Submit(SubmitArgs),
    /// Show the consolidated group ranking.
    Results(ResultsArgs),
    /// Plan a walking order for the group's favourites.
    Itinerary(ItineraryArgs),
    /// Delete every ranking (admin only).
    Reset(ResetArgs),
    /// Show or change the app name and icon (changes are admin only).
    Brand(BrandArgs),
    /// Show or set the media of an attraction (changes are admin only).
    Media(MediaArgs),
}

#[cfg(test)]
mod tests;
