//! Test helpers for building a throwaway group and driving the CLI.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use ridevote_core::test_support::StubOptimiser;
use ridevote_core::{Catalog, ItineraryOptimiser};
use ridevote_data::reasoning::HttpItineraryOptimiserConfig;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Izza administers the group; Leo and Camille are ordinary members.
pub(super) const ROSTER_JSON: &str = r#"{
    "members": [
        { "name": "Izza", "role": "admin" },
        { "name": "Leo" },
        { "name": "Camille", "role": "member" }
    ]
}"#;

/// A temporary data directory with a roster file beside it.
#[derive(Debug)]
pub(super) struct Group {
    _dir: TempDir,
    root: Utf8PathBuf,
    data_dir: Utf8PathBuf,
    roster: Utf8PathBuf,
}

impl Group {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let data_dir = root.join("data");
        let roster = root.join("roster.json");
        write_utf8(&roster, ROSTER_JSON.as_bytes());
        Self {
            _dir: dir,
            root,
            data_dir,
            roster,
        }
    }

    pub(super) fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub(super) fn roster(&self) -> &Utf8Path {
        &self.roster
    }

    /// Write `ids` as a ranking file and return its path.
    pub(super) fn ranking_file(&self, file_name: &str, ids: &[String]) -> Utf8PathBuf {
        let path = self.root.join(file_name);
        let payload = serde_json::to_string(ids).expect("serialise ranking");
        write_utf8(&path, payload.as_bytes());
        path
    }

    /// `ridevote <args> --data-dir <dir>`.
    pub(super) fn argv(&self, args: &[&str]) -> Vec<String> {
        let mut argv = vec!["ridevote".to_owned()];
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        argv.extend([format!("--{ARG_DATA_DIR}"), self.data_dir.as_str().to_owned()]);
        argv
    }

    /// Like [`Group::argv`] with `--roster` appended.
    pub(super) fn argv_with_roster(&self, args: &[&str]) -> Vec<String> {
        let mut argv = self.argv(args);
        argv.extend([format!("--{ARG_ROSTER}"), self.roster.as_str().to_owned()]);
        argv
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Every builtin id in catalog order.
pub(super) fn catalog_order() -> Vec<String> {
    Catalog::builtin()
        .ids()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Catalog order with `first` moved to the front.
pub(super) fn favouring(first: &str) -> Vec<String> {
    let mut ids = catalog_order();
    ids.retain(|id| id != first);
    ids.insert(0, first.to_owned());
    ids
}

/// Hands out clones of one shared stub so tests can count calls.
#[derive(Debug)]
pub(super) struct StubOptimiserBuilder {
    optimiser: Arc<StubOptimiser>,
}

impl StubOptimiserBuilder {
    pub(super) fn new(optimiser: StubOptimiser) -> Self {
        Self {
            optimiser: Arc::new(optimiser),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.optimiser.calls()
    }
}

impl OptimiserBuilder for StubOptimiserBuilder {
    fn build(
        &self,
        _config: &HttpItineraryOptimiserConfig,
    ) -> Result<Box<dyn ItineraryOptimiser>, CliError> {
        Ok(Box::new(Arc::clone(&self.optimiser)))
    }
}

/// Parse `argv` and run it, capturing stdout.
pub(super) fn run_cli(
    argv: Vec<String>,
    builder: &dyn OptimiserBuilder,
) -> (Result<(), CliError>, String) {
    let mut buffer = Vec::new();
    let outcome = Cli::try_parse_from(argv)
        .map_err(CliError::from)
        .and_then(|cli| run_with(cli, builder, &mut buffer));
    let stdout = String::from_utf8(buffer).expect("stdout utf-8");
    (outcome, stdout)
}
