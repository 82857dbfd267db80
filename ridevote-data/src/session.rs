//! Locally remembered display name.
//!
//! The marker is a small JSON document, `{"name": "..."}`, holding only the
//! active display name. It is not a credential.

use camino::{Utf8Path, Utf8PathBuf};
use ridevote_core::UserName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fs;

/// Errors raised while reading or writing a [`SessionFile`].
#[derive(Debug, Error)]
pub enum SessionFileError {
    /// Filesystem access failed.
    #[error("failed to access session file {path}: {source}")]
    Io {
        /// Location of the session file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file did not contain a valid marker.
    #[error("session file {path} is malformed: {source}")]
    Malformed {
        /// Location of the session file.
        path: Utf8PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Marker {
    name: UserName,
}

/// File-backed session marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    path: Utf8PathBuf,
}

impl SessionFile {
    /// Use the marker stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the marker.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the remembered name, or `None` when nobody is logged in.
    ///
    /// # Errors
    /// Returns [`SessionFileError`] when the file exists but cannot be read
    /// or parsed.
    pub fn load(&self) -> Result<Option<UserName>, SessionFileError> {
        let Some(contents) = fs::read_optional(&self.path).map_err(|source| self.io(source))?
        else {
            return Ok(None);
        };
        let marker: Marker =
            serde_json::from_str(&contents).map_err(|source| SessionFileError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(marker.name))
    }

    /// Remember `name`, replacing any previous marker.
    ///
    /// # Errors
    /// Returns [`SessionFileError::Io`] when the file cannot be written.
    pub fn save(&self, name: &UserName) -> Result<(), SessionFileError> {
        let marker = Marker { name: name.clone() };
        let json = serde_json::to_string(&marker).map_err(|source| SessionFileError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, &json).map_err(|source| self.io(source))?;
        log::debug!("remembered {name} in {}", self.path);
        Ok(())
    }

    /// Forget the remembered name. Returns whether one was stored.
    ///
    /// # Errors
    /// Returns [`SessionFileError::Io`] when the file cannot be removed.
    pub fn clear(&self) -> Result<bool, SessionFileError> {
        fs::remove_if_present(&self.path).map_err(|source| self.io(source))
    }

    fn io(&self, source: std::io::Error) -> SessionFileError {
        SessionFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
