//! Persistence for the item table
//!
//! The whole pool lives in a single JSON file (an array of items) that is
//! read once at session start and overwritten wholesale on save. Absent
//! review-state fields are backfilled by serde defaults at load time.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::quiz::Item;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("item table not found: {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Whole-file store for the item table
pub struct WordStore {
    path: PathBuf,
}

impl WordStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default location: `<data dir>/recall/words.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("recall").join("words.json"))
    }

    /// Load the full item table. A missing file is a typed error so the CLI
    /// can report it without a backtrace.
    pub fn load(&self) -> Result<Vec<Item>> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let items: Vec<Item> = serde_json::from_str(&content)?;
        log::info!("loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }

    /// Overwrite the backing file with the full item table
    pub fn save(&self, items: &[Item]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        log::info!("saved {} items to {}", items.len(), self.path.display());
        Ok(())
    }
}
