/// Data layer: column store, ingestion, cleaning, selection, windowing, export.
///
/// Architecture:
/// ```text
///   delimited text (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce → LoadedDataset (ColumnStore + Schema)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐      ┌───────────┐
///   │ ColumnStore  │ ───▶ │  clean     │  outliers → zeros → negatives
///   │ (immutable)  │ ───▶ │  selection │  drop global row indices
///   └─────────────┘      └───────────┘
///        │        │              │
///        │        └──── new store (generation + 1)
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │  window   │        │  export   │  header + rows, padded
///   └──────────┘        └──────────┘
/// ```
///
/// Every transform takes a store by reference and returns a new one; nothing
/// here holds state between calls.

pub mod clean;
pub mod error;
pub mod export;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod quartile;
pub mod selection;
pub mod window;

pub use error::{PipelineError, Result};
pub use model::{ColumnStore, LoadedDataset, Schema};
