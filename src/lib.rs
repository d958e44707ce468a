//! Core library for the recall vocabulary trainer.
//!
//! The `quiz` module holds the scheduling engine: item models, the SM-2
//! derived interval calculation, answer judging, priority selection and the
//! session controller. `storage` persists the item table as a single JSON
//! file, `convert` bridges to CSV for spreadsheet interchange, and `fill`
//! consults an online dictionary to populate missing translations and
//! example sentences.

pub mod convert;
pub mod fill;
pub mod quiz;
pub mod storage;
