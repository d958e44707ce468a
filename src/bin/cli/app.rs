use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use recall_lib::quiz::{Item, Session, SessionController, StdinInput};
use recall_lib::storage::{StoreError, WordStore};

use crate::render::TerminalPresenter;

/// Resolve and load the item table. A missing backing file is fatal for the
/// session but reported as a plain message, never a backtrace; `None` tells
/// the caller to exit quietly.
pub fn open_table(file: Option<PathBuf>) -> Result<Option<(WordStore, Vec<Item>)>> {
    let path = match file {
        Some(path) => path,
        None => WordStore::default_path().context("Failed to resolve the data directory")?,
    };

    let store = WordStore::new(path);
    match store.load() {
        Ok(items) => Ok(Some((store, items))),
        Err(StoreError::Missing(path)) => {
            eprintln!("Item table not found at {}.", path.display());
            eprintln!(
                "Point --file at an existing table, or create one with `recall convert <file.csv>`."
            );
            Ok(None)
        }
        Err(error) => Err(error).context("Failed to load the item table"),
    }
}

/// Shared state for the interactive session
pub struct App {
    store: WordStore,
    pub controller: SessionController,
    pub use_color: bool,
}

impl App {
    pub fn new(store: WordStore, items: Vec<Item>, time_limit: f64, use_color: bool) -> Self {
        let session = Session {
            time_limit,
            ..Session::default()
        };
        let controller = SessionController::new(
            items,
            session,
            Arc::new(StdinInput),
            Arc::new(TerminalPresenter::new(use_color)),
        );

        Self {
            store,
            controller,
            use_color,
        }
    }

    /// Overwrite the backing file with the current item table
    pub fn save(&self) -> Result<()> {
        self.store
            .save(self.controller.items())
            .context("Failed to save progress")
    }
}
