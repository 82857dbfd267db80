//! SQLite persistence for rankings, attraction overrides and branding.
//!
//! Rankings live in a `rankings` table keyed by user name with the ordered
//! ids stored as a JSON array. Overrides live in `attraction_overrides` and
//! the branding document in a single `settings` row. Every ranking write
//! publishes a fresh snapshot to subscribers. A write that commits stays
//! committed: if the snapshot cannot be decoded afterwards, the write still
//! succeeds and subscribers simply miss that update.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use ridevote_core::{
    AppBranding, AttractionError, AttractionId, AttractionOverride, DisplayStore, RankingError,
    RankingFeed, RankingListener, RankingStore, ResetReport, StoreError, Subscription, UserName,
    UserRanking,
};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, params};
use thiserror::Error;

use crate::fs;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rankings (
    user_name TEXT PRIMARY KEY NOT NULL,
    attraction_ids TEXT NOT NULL,
    updated_at_ms INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS attraction_overrides (
    attraction_id TEXT PRIMARY KEY NOT NULL,
    image_url TEXT,
    video_url TEXT
);
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);";

const BRANDING_KEY: &str = "branding";

/// Errors raised by [`SqliteRankingStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the tables failed.
    #[error("failed to initialise the store schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A statement failed.
    #[error("SQLite statement failed: {0}")]
    Query(#[from] SqliteError),
    /// A JSON column could not be encoded or decoded.
    #[error("record {key} holds invalid JSON: {source}")]
    InvalidJson {
        /// Key of the offending row.
        key: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored ranking violates ranking invariants.
    #[error("record {key} holds an invalid ranking: {source}")]
    InvalidRanking {
        /// Key of the offending row.
        key: String,
        /// Validation failure.
        #[source]
        source: RankingError,
    },
    /// A stored override names an invalid attraction id.
    #[error("record {key} holds an invalid attraction id: {source}")]
    InvalidAttraction {
        /// Key of the offending row.
        key: String,
        /// Validation failure.
        #[source]
        source: AttractionError,
    },
    /// A timestamp does not fit the SQLite integer range.
    #[error("timestamp for {key} is out of range")]
    TimestampOutOfRange {
        /// Key of the offending row.
        key: String,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(err: SqliteStoreError) -> Self {
        match &err {
            SqliteStoreError::InvalidJson { key, .. }
            | SqliteStoreError::InvalidRanking { key, .. }
            | SqliteStoreError::InvalidAttraction { key, .. }
            | SqliteStoreError::TimestampOutOfRange { key } => Self::Corrupt {
                key: key.clone(),
                message: err.to_string(),
            },
            SqliteStoreError::CreateDirectory { .. }
            | SqliteStoreError::Open { .. }
            | SqliteStoreError::CreateSchema { .. }
            | SqliteStoreError::Query(_) => Self::Unavailable {
                message: err.to_string(),
            },
        }
    }
}

/// [`RankingStore`] and [`DisplayStore`] persisted to a SQLite file.
///
/// # Examples
/// ```
/// use ridevote_core::{AttractionId, RankingStore, UserName, UserRanking};
/// use ridevote_data::SqliteRankingStore;
///
/// let store = SqliteRankingStore::open_in_memory()?;
/// let mina = UserName::new("Mina")?;
/// store.put_ranking(UserRanking::new(mina.clone(), vec![AttractionId::new("dlp_1")?], 5)?)?;
/// assert_eq!(store.get_ranking(&mina)?.map(|r| r.updated_at_ms()), Some(5));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SqliteRankingStore {
    conn: Mutex<Connection>,
    feed: RankingFeed,
}

impl SqliteRankingStore {
    /// Open or create the database at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        fs::ensure_parent_dir(path).map_err(|source| SqliteStoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let conn =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("opened ranking store at {path}");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let conn = Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, SqliteStoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|source| SqliteStoreError::CreateSchema { source })?;
        Ok(Self {
            conn: Mutex::new(conn),
            feed: RankingFeed::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_ranking(&self, ranking: &UserRanking) -> Result<(), SqliteStoreError> {
        let key = ranking.user_name().to_string();
        let ids = serde_json::to_string(ranking.attraction_ids()).map_err(|source| {
            SqliteStoreError::InvalidJson {
                key: key.clone(),
                source,
            }
        })?;
        let updated_at = i64::try_from(ranking.updated_at_ms())
            .map_err(|_| SqliteStoreError::TimestampOutOfRange { key: key.clone() })?;

        self.lock().execute(
            "INSERT OR REPLACE INTO rankings (user_name, attraction_ids, updated_at_ms)
             VALUES (?1, ?2, ?3)",
            params![key, ids, updated_at],
        )?;
        Ok(())
    }

    fn clear_rankings(&self) -> Result<usize, SqliteStoreError> {
        let mut conn = self.lock();
        let transaction = conn.transaction()?;
        let deleted = transaction.execute("DELETE FROM rankings", [])?;
        transaction.commit()?;
        Ok(deleted)
    }

    fn read_overrides(&self) -> Result<Vec<AttractionOverride>, SqliteStoreError> {
        let conn = self.lock();
        let mut statement = conn.prepare(
            "SELECT attraction_id, image_url, video_url
             FROM attraction_overrides ORDER BY attraction_id",
        )?;
        let rows = statement.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        let mut overrides = Vec::new();
        for row in rows {
            let (key, image_url, video_url) = row?;
            let attraction_id = AttractionId::new(key.as_str())
                .map_err(|source| SqliteStoreError::InvalidAttraction { key, source })?;
            overrides.push(AttractionOverride {
                attraction_id,
                image_url,
                video_url,
            });
        }
        Ok(overrides)
    }

    fn write_override(&self, entry: &AttractionOverride) -> Result<(), SqliteStoreError> {
        self.lock().execute(
            "INSERT OR REPLACE INTO attraction_overrides (attraction_id, image_url, video_url)
             VALUES (?1, ?2, ?3)",
            params![entry.attraction_id.as_str(), entry.image_url, entry.video_url],
        )?;
        Ok(())
    }

    fn read_branding(&self) -> Result<AppBranding, SqliteStoreError> {
        let stored: Option<String> = self
            .lock()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![BRANDING_KEY],
                |row| row.get(0),
            )
            .optional()?;
        stored.map_or_else(
            || Ok(AppBranding::default()),
            |json| {
                serde_json::from_str(&json).map_err(|source| SqliteStoreError::InvalidJson {
                    key: BRANDING_KEY.to_owned(),
                    source,
                })
            },
        )
    }

    fn write_branding(&self, branding: &AppBranding) -> Result<(), SqliteStoreError> {
        let json =
            serde_json::to_string(branding).map_err(|source| SqliteStoreError::InvalidJson {
                key: BRANDING_KEY.to_owned(),
                source,
            })?;
        self.lock().execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![BRANDING_KEY, json],
        )?;
        Ok(())
    }
}

fn read_rankings(conn: &Connection) -> Result<Vec<UserRanking>, SqliteStoreError> {
    let mut statement = conn.prepare(
        "SELECT user_name, attraction_ids, updated_at_ms FROM rankings ORDER BY user_name",
    )?;
    let rows = statement.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;
    let mut rankings = Vec::new();
    for row in rows {
        let (key, ids, updated_at) = row?;
        rankings.push(decode_ranking(key, &ids, updated_at)?);
    }
    Ok(rankings)
}

fn read_ranking(
    conn: &Connection,
    user: &UserName,
) -> Result<Option<UserRanking>, SqliteStoreError> {
    let row = conn
        .query_row(
            "SELECT user_name, attraction_ids, updated_at_ms FROM rankings WHERE user_name = ?1",
            params![user.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;
    row.map(|(key, ids, updated_at)| decode_ranking(key, &ids, updated_at))
        .transpose()
}

fn decode_ranking(key: String, ids: &str, updated_at: i64) -> Result<UserRanking, SqliteStoreError> {
    let user = UserName::new(&key).map_err(|source| SqliteStoreError::InvalidRanking {
        key: key.clone(),
        source,
    })?;
    let attraction_ids: Vec<AttractionId> =
        serde_json::from_str(ids).map_err(|source| SqliteStoreError::InvalidJson {
            key: key.clone(),
            source,
        })?;
    let updated_at_ms = u64::try_from(updated_at)
        .map_err(|_| SqliteStoreError::TimestampOutOfRange { key: key.clone() })?;
    UserRanking::new(user, attraction_ids, updated_at_ms)
        .map_err(|source| SqliteStoreError::InvalidRanking { key, source })
}

impl RankingStore for SqliteRankingStore {
    fn all_rankings(&self) -> Result<Vec<UserRanking>, StoreError> {
        Ok(read_rankings(&self.lock())?)
    }

    fn get_ranking(&self, user: &UserName) -> Result<Option<UserRanking>, StoreError> {
        Ok(read_ranking(&self.lock(), user)?)
    }

    fn put_ranking(&self, ranking: UserRanking) -> Result<(), StoreError> {
        let publication = self.feed.begin();
        self.write_ranking(&ranking)?;
        match read_rankings(&self.lock()) {
            Ok(snapshot) => publication.publish(&snapshot),
            Err(err) => log::warn!(
                "saved ranking for {} but could not publish a snapshot: {err}",
                ranking.user_name()
            ),
        }
        Ok(())
    }

    fn delete_all_rankings(&self) -> Result<ResetReport, StoreError> {
        let publication = self.feed.begin();
        let deleted = self.clear_rankings()?;
        log::info!("removed {deleted} ranking(s)");
        publication.publish(&[]);
        Ok(ResetReport { deleted })
    }

    fn subscribe(&self, listener: RankingListener) -> Result<Subscription, StoreError> {
        let publication = self.feed.begin();
        let snapshot = read_rankings(&self.lock())?;
        Ok(publication.register(listener, &snapshot))
    }
}

impl DisplayStore for SqliteRankingStore {
    fn attraction_overrides(&self) -> Result<Vec<AttractionOverride>, StoreError> {
        Ok(self.read_overrides()?)
    }

    fn put_attraction_override(&self, entry: AttractionOverride) -> Result<(), StoreError> {
        Ok(self.write_override(&entry)?)
    }

    fn branding(&self) -> Result<AppBranding, StoreError> {
        Ok(self.read_branding()?)
    }

    fn put_branding(&self, branding: AppBranding) -> Result<(), StoreError> {
        Ok(self.write_branding(&branding)?)
    }
}
