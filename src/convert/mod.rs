//! Format adapter between the persisted JSON table and CSV spreadsheets
//!
//! Pure interchange: the scheduler never reads CSV. Review-state columns
//! round-trip so a table exported mid-study keeps its schedule.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::quiz::Item;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported extension '{0}': expected .csv or .json")]
    UnsupportedExtension(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Convert a file to the sibling format, picked by extension. Returns the
/// written path: `words.csv` becomes `words.json` and vice versa.
pub fn convert(input: &Path) -> Result<PathBuf> {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let output = input.with_extension("json");
            csv_to_json(input, &output)?;
            Ok(output)
        }
        "json" => {
            let output = input.with_extension("csv");
            json_to_csv(input, &output)?;
            Ok(output)
        }
        other => Err(ConvertError::UnsupportedExtension(other.to_string())),
    }
}

/// Read a CSV item table and write it as pretty-printed JSON
pub fn csv_to_json(input: &Path, output: &Path) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(input)?;

    let mut items = Vec::new();
    for record in reader.deserialize() {
        let item: Item = record?;
        items.push(item);
    }

    fs::write(output, serde_json::to_string_pretty(&items)?)?;
    log::info!("converted {} rows to {}", items.len(), output.display());
    Ok(())
}

/// Read a JSON item table and write it as CSV with a header row
pub fn json_to_csv(input: &Path, output: &Path) -> Result<()> {
    let content = fs::read_to_string(input)?;
    let items: Vec<Item> = serde_json::from_str(&content)?;

    let mut writer = csv::Writer::from_path(output)?;
    for item in &items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    log::info!("converted {} items to {}", items.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = convert(Path::new("words.xlsx"));
        assert!(matches!(result, Err(ConvertError::UnsupportedExtension(_))));
    }

    #[test]
    fn test_json_csv_roundtrip_preserves_review_state() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("words.json");

        let mut item = Item::default();
        item.voc = "run".to_string();
        item.translation = "跑".to_string();
        item.sentence = "Run fast.".to_string();
        item.memorize = "hint".to_string();
        item.review_interval = 6;
        item.review_count = 2;
        item.ease_factor = 1.9;
        item.next_review_at = "2024-05-01 09:30:00".to_string();
        fs::write(&json_path, serde_json::to_string_pretty(&[item]).unwrap()).unwrap();

        let csv_path = convert(&json_path).unwrap();
        assert_eq!(csv_path, dir.path().join("words.csv"));

        // Converting back lands on the original path with the same content
        let json_again = convert(&csv_path).unwrap();
        assert_eq!(json_again, json_path);
        let items: Vec<Item> =
            serde_json::from_str(&fs::read_to_string(&json_again).unwrap()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].voc, "run");
        assert_eq!(items[0].review_interval, 6);
        assert_eq!(items[0].review_count, 2);
        assert_eq!(items[0].ease_factor, 1.9);
        assert_eq!(items[0].next_review_at, "2024-05-01 09:30:00");
    }
}
