use std::collections::BTreeSet;

use super::model::{Column, ColumnStore};

// ---------------------------------------------------------------------------
// Selection set: global row indices marked for removal
// ---------------------------------------------------------------------------

/// Global (not window-relative) row positions to delete.
pub type SelectionSet = BTreeSet<usize>;

/// Remove the selected positions from every column.
///
/// The same positions go from each column, so an aligned store stays
/// aligned. Positions past a column's end are ignored for that column. An
/// empty selection returns an equal store.
pub fn remove_rows(store: &ColumnStore, selection: &SelectionSet) -> ColumnStore {
    if selection.is_empty() {
        return store.derive(store.columns().to_vec());
    }

    let columns: Vec<Column> = store
        .columns()
        .iter()
        .map(|col| {
            if selection.range(..col.len()).next().is_none() {
                return col.clone();
            }
            let kept: Vec<f64> = col
                .values
                .iter()
                .enumerate()
                .filter(|(row, _)| !selection.contains(row))
                .map(|(_, &v)| v)
                .collect();
            Column::new(col.name.clone(), kept)
        })
        .collect();

    let next = store.derive(columns);
    log::info!(
        "Removed {} selected rows ({} -> {} rows)",
        selection.len(),
        store.row_count(),
        next.row_count()
    );
    next
}
