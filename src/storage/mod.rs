//! # Storage Module - Game Document Persistence
//!
//! The whole game state lives in one JSON document. This module loads it (falling back
//! to a fresh document when the file is missing or unreadable) and writes it back
//! atomically after every applied operation.
//!
//! ```text
//! data/
//! ├── game_state.json                      ← current document
//! └── game_state.json.corrupt-<timestamp>  ← unreadable documents moved aside
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ascend::storage::GameStore;
//! use ascend::engine::types::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = GameStore::open("./data", "game_state.json").await?;
//!     let today = chrono::Local::now().date_naive();
//!     let (doc, _source) = store.load_or_default("Hunter", Settings::default(), today).await?;
//!     store.save(&doc).await?;
//!     Ok(())
//! }
//! ```
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::engine::errors::EngineError;
use crate::engine::state::new_document_with_settings;
use crate::engine::types::{GameDocument, Settings, DOCUMENT_SCHEMA_VERSION};
use crate::validation::{validate_file_size, MAX_DOCUMENT_BYTES};

/// Where the document returned by [`GameStore::load_or_default`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Existing,
    /// No file on disk; a fresh document was built.
    Created,
    /// The file could not be parsed and was moved to the contained path.
    Recovered(PathBuf),
}

/// File-backed store for the single game document.
#[derive(Debug, Clone)]
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    /// Store for an explicit document path. The parent directory must exist before saving.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the data directory if needed and return a store for `data_dir/state_file`.
    pub async fn open(data_dir: impl AsRef<Path>, state_file: &str) -> Result<Self, EngineError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;
        Ok(Self::new(data_dir.join(state_file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, or build a fresh one when the file is missing or corrupt.
    ///
    /// A document written with a different schema version is refused rather than
    /// replaced, so newer data is never clobbered.
    pub async fn load_or_default(
        &self,
        player_name: &str,
        settings: Settings,
        today: NaiveDate,
    ) -> Result<(GameDocument, LoadSource), EngineError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No game document at {}, starting fresh",
                    self.path.display()
                );
                let doc = new_document_with_settings(player_name, today, settings);
                return Ok((doc, LoadSource::Created));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = validate_file_size(raw.len() as u64, MAX_DOCUMENT_BYTES) {
            let backup = self.recover(&e).await?;
            let doc = new_document_with_settings(player_name, today, settings);
            return Ok((doc, LoadSource::Recovered(backup)));
        }

        match parse_document(&raw) {
            Ok(doc) => {
                debug!("Loaded game document from {}", self.path.display());
                Ok((doc, LoadSource::Existing))
            }
            Err(err @ EngineError::SchemaMismatch { .. }) => Err(err),
            Err(err) => {
                let backup = self.recover(&err).await?;
                let doc = new_document_with_settings(player_name, today, settings);
                Ok((doc, LoadSource::Recovered(backup)))
            }
        }
    }

    /// Persist the document as pretty JSON with an atomic replace.
    pub async fn save(&self, doc: &GameDocument) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(doc)?;
        write_file_locked(&self.path, &json)?;
        debug!("Saved game document to {}", self.path.display());
        Ok(())
    }

    async fn recover(&self, reason: &dyn std::fmt::Display) -> Result<PathBuf, EngineError> {
        let backup = self.quarantine().await?;
        warn!(
            "Game document {} is unreadable ({}); moved to {} and starting fresh",
            self.path.display(),
            reason,
            backup.display()
        );
        Ok(backup)
    }

    /// Move an unreadable document aside so a fresh one can take its place.
    async fn quarantine(&self) -> Result<PathBuf, EngineError> {
        let base = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("game_state.json");
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let backup = self.path.with_file_name(format!("{}.corrupt-{}", base, stamp));
        tokio::fs::rename(&self.path, &backup).await?;
        Ok(backup)
    }
}

/// Parse a document, checking the schema version before the full structure.
pub fn parse_document(raw: &[u8]) -> Result<GameDocument, EngineError> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    if let Some(found) = value.get("schema_version").and_then(|v| v.as_u64()) {
        if found != DOCUMENT_SCHEMA_VERSION as u64 {
            return Err(EngineError::SchemaMismatch {
                expected: DOCUMENT_SCHEMA_VERSION,
                found: u8::try_from(found).unwrap_or(u8::MAX),
            });
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Write `content` to `path` atomically while holding an exclusive lock.
///
/// The content goes to a unique temp file in the same directory, is fsynced, and is
/// renamed over the destination. The directory fsync afterwards is best-effort.
pub fn write_file_locked(path: &Path, content: &str) -> Result<(), EngineError> {
    use std::fs::{self, File, OpenOptions};
    use std::io::Write;

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("game_state.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                tmp.sync_all()?;
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    drop(lock_file);
    Ok(())
}
