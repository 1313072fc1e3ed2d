//! Save games: one serialized [`GameState`] snapshot under a fixed key.
//!
//! Storage is any [`SaveStore`]; the snapshot is wrapped in a versioned
//! envelope so older saves can be told apart from corrupt ones.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use game_rules::GameState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors from save storage.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Key-value storage for save blobs.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store that keeps each key in `<dir>/<key>.json`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{sanitized}.json"))
    }
}

impl SaveStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A saved playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// Unix milliseconds at the time of saving.
    pub saved_at_ms: u64,

    pub state: GameState,
}

impl SavedGame {
    pub fn new(state: GameState, saved_at_ms: u64) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at_ms,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a save, rejecting other format versions and pulling the calendar back into range.
    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        let mut saved: Self = serde_json::from_str(content)?;
        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }
        saved.state.normalize_calendar();
        Ok(saved)
    }
}

/// Write a snapshot of `state`. Returns false (and logs) if the store refused it.
pub fn save_game(store: &mut dyn SaveStore, key: &str, state: &GameState, now_ms: u64) -> bool {
    let result = SavedGame::new(state.clone(), now_ms)
        .to_json()
        .and_then(|json| store.set(key, &json));
    match result {
        Ok(()) => {
            info!(playthrough = %state.id, key, "game saved");
            true
        }
        Err(err) => {
            error!(key, error = %err, "failed to save game");
            false
        }
    }
}

/// Read the snapshot under `key`. A missing or unreadable save is `None`.
pub fn load_game(store: &dyn SaveStore, key: &str) -> Option<GameState> {
    let content = match store.get(key) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!(key, "no save found");
            return None;
        }
        Err(err) => {
            error!(key, error = %err, "failed to read save");
            return None;
        }
    };

    match SavedGame::from_json(&content) {
        Ok(saved) => Some(saved.state),
        Err(err) => {
            error!(key, error = %err, "discarding unreadable save");
            None
        }
    }
}

/// Delete the save under `key`, if any.
pub fn clear_game(store: &mut dyn SaveStore, key: &str) {
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to clear save");
    }
}

/// Whether a loadable save exists under `key`.
pub fn has_save(store: &dyn SaveStore, key: &str) -> bool {
    load_game(store, key).is_some()
}
