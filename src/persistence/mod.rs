//! Persistence adapter: a save record schema plus the key-value stores it
//! is written to. Saving and loading are best-effort; failures are logged
//! and never interrupt play.

mod record;
mod store;

pub use record::{Restored, SaveRecord};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use thiserror::Error;

/// Default key the game is stored under
pub const DEFAULT_SAVE_KEY: &str = "mars-colony";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A store plus the key one game lives under
pub struct SaveSlot {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl SaveSlot {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// In-memory slot, mostly for tests and embedding
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_SAVE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn try_save(&mut self, record: &SaveRecord) -> Result<(), PersistError> {
        let json = record.to_json()?;
        self.store.set(&self.key, &json)
    }

    pub fn try_load(&self) -> Result<Option<SaveRecord>, PersistError> {
        self.store
            .get(&self.key)?
            .map(|json| SaveRecord::from_json(&json))
            .transpose()
            .map_err(PersistError::from)
    }

    /// Save, logging and swallowing any failure
    pub fn save(&mut self, record: &SaveRecord) -> bool {
        match self.try_save(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.key, "save failed: {e}");
                false
            }
        }
    }

    /// Load, treating a missing or malformed record as "no saved game"
    pub fn load(&self) -> Option<SaveRecord> {
        match self.try_load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(key = %self.key, "load failed, starting fresh: {e}");
                None
            }
        }
    }

    /// Forget the saved game
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, "clearing save failed: {e}");
        }
    }
}
