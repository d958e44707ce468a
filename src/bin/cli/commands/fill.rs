use std::path::PathBuf;

use anyhow::{Context, Result};

use recall_lib::fill::{fill_missing, DictionaryClient};

use crate::app;

/// Fill missing translations and example sentences from the dictionary,
/// checkpointing progress along the way
pub fn run(file: Option<PathBuf>) -> Result<()> {
    let Some((store, mut items)) = app::open_table(file)? else {
        return Ok(());
    };

    let client = DictionaryClient::new().context("Failed to build the dictionary client")?;
    println!("Looking up missing translations and sentences...");

    let report = fill_missing(&client, &mut items, true, |snapshot| {
        match store.save(snapshot) {
            Ok(()) => println!("[checkpoint] progress saved"),
            Err(error) => log::warn!("checkpoint save failed: {}", error),
        }
    });

    println!(
        "Done: {} looked up, {} filled, {} errors.",
        report.looked_up, report.filled, report.errors
    );
    Ok(())
}
