use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};
use super::model::{Column, ColumnStore, LoadedDataset, Schema};

/// Records parsed between two checks of the cancel flag.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Minimum number of numeric columns a dataset needs to be plotted.
pub const MIN_COLUMNS: usize = 2;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a row whose cells do not all coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Keep each column's numeric survivors independently. Columns may end
    /// up with different lengths.
    #[default]
    PerColumn,
    /// Keep a row only if every retained column coerces in it.
    DropIncompleteRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Field separator; must be an ASCII character.
    pub delimiter: char,
    pub row_policy: RowPolicy,
    pub chunk_size: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            row_policy: RowPolicy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a delimited file from disk.
pub fn load_file(path: &Path, options: &IngestOptions) -> Result<LoadedDataset> {
    let never = AtomicBool::new(false);
    load_file_cancellable(path, options, &never)
}

pub fn load_file_cancellable(
    path: &Path,
    options: &IngestOptions,
    cancel: &AtomicBool,
) -> Result<LoadedDataset> {
    let file = File::open(path)?;
    read_dataset(file, options, cancel)
}

/// Parse in-memory delimited text.
pub fn parse_str(text: &str, options: &IngestOptions) -> Result<LoadedDataset> {
    let never = AtomicBool::new(false);
    read_dataset(text.as_bytes(), options, &never)
}

/// Parse a header row plus data rows into numeric columns.
///
/// Each cell is trimmed and coerced to a finite `f64`; cells that do not
/// coerce are dropped from their column only. A column is kept when at least
/// one value survived. Fails with [`PipelineError::Schema`] when fewer than
/// [`MIN_COLUMNS`] columns are kept, and aborts with
/// [`PipelineError::Cancelled`] once `cancel` is set.
pub fn read_dataset<R: Read>(
    input: R,
    options: &IngestOptions,
    cancel: &AtomicBool,
) -> Result<LoadedDataset> {
    if !options.delimiter.is_ascii() {
        return Err(PipelineError::Parse(format!(
            "delimiter {:?} is not an ASCII character",
            options.delimiter
        )));
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(PipelineError::Parse("input has no header row".into()));
    }

    // One cell per header per record; `None` where the cell did not coerce.
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    let chunk_size = options.chunk_size.max(1);
    let mut rows_read = 0usize;
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        if rows_read % chunk_size == 0 {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("ingestion cancelled after {rows_read} rows");
                return Err(PipelineError::Cancelled);
            }
            if rows_read > 0 {
                log::debug!("ingested {rows_read} rows");
            }
        }
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).and_then(coerce));
        }
        rows_read += 1;
    }

    let fields = distinct_fields(&headers);
    let columns = match options.row_policy {
        RowPolicy::PerColumn => per_column(&fields, &cells),
        RowPolicy::DropIncompleteRows => drop_incomplete_rows(&fields, &cells, rows_read),
    };

    let store = ColumnStore::new(columns);
    if store.num_columns() < MIN_COLUMNS {
        return Err(PipelineError::Schema {
            found: store.num_columns(),
        });
    }

    let schema = Schema::new(store.names().map(str::to_owned).collect());
    log::info!(
        "Ingested {rows_read} rows into {} numeric columns {schema}",
        schema.len()
    );
    Ok(LoadedDataset {
        store,
        schema,
        rows_read,
    })
}

/// Coerce one trimmed cell. Non-finite spellings (`inf`, `NaN`) are rejected.
pub fn coerce(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Row policies
// ---------------------------------------------------------------------------

/// Resolve repeated header names before any column is judged numeric: each
/// name keeps the position of its first occurrence and reads the cells of its
/// last one.
fn distinct_fields(headers: &[String]) -> Vec<(&str, usize)> {
    let mut fields: Vec<(&str, usize)> = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        match fields.iter_mut().find(|(seen, _)| *seen == name.as_str()) {
            Some(field) => {
                log::debug!("header '{name}' repeated, using column {idx}");
                field.1 = idx;
            }
            None => fields.push((name.as_str(), idx)),
        }
    }
    fields
}

fn per_column(fields: &[(&str, usize)], cells: &[Vec<Option<f64>>]) -> Vec<Column> {
    fields
        .iter()
        .filter_map(|&(name, idx)| {
            let values: Vec<f64> = cells[idx].iter().flatten().copied().collect();
            if values.is_empty() {
                log::debug!("dropping non-numeric column '{name}'");
                return None;
            }
            Some(Column::new(name, values))
        })
        .collect()
}

fn drop_incomplete_rows(
    fields: &[(&str, usize)],
    cells: &[Vec<Option<f64>>],
    rows_read: usize,
) -> Vec<Column> {
    let valid: Vec<(&str, usize)> = fields
        .iter()
        .copied()
        .filter(|&(_, idx)| cells[idx].iter().any(Option::is_some))
        .collect();

    let complete: Vec<usize> = (0..rows_read)
        .filter(|&row| valid.iter().all(|&(_, idx)| cells[idx][row].is_some()))
        .collect();
    if complete.len() < rows_read {
        log::debug!(
            "dropped {} incomplete rows of {rows_read}",
            rows_read - complete.len()
        );
    }

    valid
        .into_iter()
        .filter_map(|(name, idx)| {
            let values: Vec<f64> = complete
                .iter()
                .filter_map(|&row| cells[idx][row])
                .collect();
            if values.is_empty() {
                return None;
            }
            Some(Column::new(name, values))
        })
        .collect()
}
