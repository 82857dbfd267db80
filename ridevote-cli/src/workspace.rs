//! Local data directory, roster loading and session resolution.

use camino::{Utf8Path, Utf8PathBuf};
use ridevote_core::{Catalog, DisplayStore, Role, Roster, Session, UserName};
use ridevote_data::{SessionFile, SqliteRankingStore, fs};

use crate::CliError;

/// Directory used when `--data-dir` is not given.
pub(crate) const DEFAULT_DATA_DIR: &str = ".ridevote";
const DATABASE_FILE: &str = "rankings.db";
const SESSION_FILE: &str = "session.json";

/// Where one group's database and this user's session marker live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Workspace {
    data_dir: Utf8PathBuf,
}

impl Workspace {
    pub(crate) fn new(data_dir: Option<Utf8PathBuf>) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    pub(crate) fn database_path(&self) -> Utf8PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub(crate) fn session_file(&self) -> SessionFile {
        SessionFile::new(self.data_dir.join(SESSION_FILE))
    }

    pub(crate) fn open_store(&self) -> Result<SqliteRankingStore, CliError> {
        let path = self.database_path();
        SqliteRankingStore::open(&path).map_err(|source| CliError::OpenStore { path, source })
    }

    pub(crate) fn current_user(&self) -> Result<Option<UserName>, CliError> {
        Ok(self.session_file().load()?)
    }

    /// The logged-in member, with their role looked up in `roster`.
    pub(crate) fn require_session(&self, roster: Option<&Roster>) -> Result<Session, CliError> {
        let name = self.current_user()?.ok_or(CliError::NotLoggedIn)?;
        resolve_session(name.as_str(), roster)
    }
}

/// Without a roster anyone may join, but only as an ordinary member.
pub(crate) fn resolve_session(name: &str, roster: Option<&Roster>) -> Result<Session, CliError> {
    roster.map_or_else(
        || {
            let user = UserName::new(name).map_err(CliError::InvalidUserName)?;
            Ok(Session::new(user, Role::Member))
        },
        |known| known.session_for(name).map_err(CliError::from),
    )
}

pub(crate) fn load_roster(path: Option<&Utf8Path>) -> Result<Option<Roster>, CliError> {
    let Some(roster_path) = path else {
        return Ok(None);
    };
    let json = fs::read_to_string(roster_path).map_err(|source| CliError::ReadRoster {
        path: roster_path.to_path_buf(),
        source,
    })?;
    Roster::from_json(&json)
        .map(Some)
        .map_err(|source| CliError::InvalidRoster {
            path: roster_path.to_path_buf(),
            source,
        })
}

/// The bundled catalog with the group's display overrides applied.
pub(crate) fn catalog(store: &dyn DisplayStore) -> Result<Catalog, CliError> {
    let overrides = store.attraction_overrides()?;
    Ok(Catalog::builtin().with_overrides(&overrides))
}
