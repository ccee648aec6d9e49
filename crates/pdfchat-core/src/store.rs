//! JSON-file persistence for the session mapping.
//!
//! The whole [`ChatHistory`] lives in one file and is rewritten on every
//! save. There is no locking: two processes sharing a file race, and the last
//! writer wins.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::ChatHistory;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed chat history in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and saves the session mapping at a fixed path.
#[derive(Debug, Clone)]
pub struct ChatHistoryStore {
    path: PathBuf,
}

impl ChatHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file. A missing file is an empty mapping.
    pub fn try_load(&self) -> Result<ChatHistory, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ChatHistory::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Like [`try_load`](Self::try_load), but logs failures and falls back to
    /// an empty mapping.
    pub fn load(&self) -> ChatHistory {
        match self.try_load() {
            Ok(history) => {
                tracing::debug!(path = %self.path.display(), sessions = history.len(), "loaded chat history");
                history
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading chat history");
                ChatHistory::new()
            }
        }
    }

    /// Rewrite the backing file with the full mapping.
    ///
    /// Serialization happens before the file is opened, so a serialization
    /// failure leaves the previous content in place.
    pub fn save(&self, history: &ChatHistory) -> Result<(), StoreError> {
        let bytes = to_pretty_json(history).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), sessions = history.len(), "saved chat history");
        Ok(())
    }
}

/// Four-space indented JSON.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}
