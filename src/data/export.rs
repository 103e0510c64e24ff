use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::error::{PipelineError, Result};
use super::model::ColumnStore;

/// Render the named columns as comma-separated text.
///
/// A header line is followed by one line per row up to the longest selected
/// column; shorter columns leave their cell empty. Lines are joined with `\n`
/// without a trailing newline. Names containing the delimiter or quotes are
/// quoted so the text parses back to the same header. Unknown names export as
/// all-empty columns.
pub fn export_csv<S: AsRef<str>>(store: &ColumnStore, columns: &[S]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, store, columns)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    String::from_utf8(buf).map_err(|e| PipelineError::Parse(e.to_string()))
}

/// Export straight to a file. The file ends with a newline after the last row.
pub fn write_csv<S: AsRef<str>>(path: &Path, store: &ColumnStore, columns: &[S]) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, store, columns)?;
    Ok(())
}

/// Stream header and rows through a `csv::Writer`, returning the row count.
fn write_records<W: Write, S: AsRef<str>>(
    out: W,
    store: &ColumnStore,
    columns: &[S],
) -> Result<usize> {
    if columns.is_empty() {
        return Err(PipelineError::Export);
    }

    let selected: Vec<&[f64]> = columns
        .iter()
        .map(|name| store.column(name.as_ref()).unwrap_or_default())
        .collect();
    let rows = selected.iter().map(|v| v.len()).max().unwrap_or(0);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(columns.iter().map(|c| c.as_ref()))?;
    for row in 0..rows {
        writer.write_record(
            selected
                .iter()
                .map(|values| values.get(row).map(f64::to_string).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    log::info!("Exported {rows} rows x {} columns", columns.len());
    Ok(rows)
}
