use std::path::Path;

use anyhow::{Context, Result};

/// Convert an item table between JSON and CSV, writing the sibling format
pub fn run(file: &Path) -> Result<()> {
    let output = recall_lib::convert::convert(file)
        .with_context(|| format!("Failed to convert {}", file.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
