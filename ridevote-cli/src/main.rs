//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::io::Write;
use std::process::ExitCode;

use ridevote_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();
    match ridevote_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            // Nothing useful remains to do if stderr is closed.
            writeln!(std::io::stderr().lock(), "ridevote: {err}").ok();
            ExitCode::FAILURE
        }
    }
}

/// Log records go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
