use serde::{Deserialize, Serialize};

use super::model::{Column, ColumnStore};
use super::quartile::quartiles;

// ---------------------------------------------------------------------------
// Cleaning options
// ---------------------------------------------------------------------------

/// Which filters to run. Enabled filters always run in the order
/// outliers → zeros → negatives, each on the previous one's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningOptions {
    pub remove_outliers: bool,
    pub remove_zeros: bool,
    pub remove_negatives: bool,
}

impl CleaningOptions {
    pub fn any(&self) -> bool {
        self.remove_outliers || self.remove_zeros || self.remove_negatives
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Keep values inside the inclusive IQR fences computed from `values` itself.
pub fn drop_outliers(values: &[f64]) -> Vec<f64> {
    let Some(q) = quartiles(values) else {
        return Vec::new();
    };
    let (lower, upper) = q.fences();
    values
        .iter()
        .copied()
        .filter(|&v| v >= lower && v <= upper)
        .collect()
}

pub fn drop_zeros(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|&v| v != 0.0).collect()
}

pub fn drop_negatives(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|&v| v >= 0.0).collect()
}

/// Run the enabled filters over one column.
pub fn clean_values(values: &[f64], options: &CleaningOptions) -> Vec<f64> {
    let mut current = values.to_vec();
    if options.remove_outliers {
        current = drop_outliers(&current);
    }
    if options.remove_zeros {
        current = drop_zeros(&current);
    }
    if options.remove_negatives {
        current = drop_negatives(&current);
    }
    current
}

/// Clean every column of `store` independently.
///
/// Columns are not realigned afterwards: each one loses whatever its own
/// filters reject, so lengths may diverge. Callers re-read the length of the
/// column they index rows by.
pub fn clean_store(store: &ColumnStore, options: &CleaningOptions) -> ColumnStore {
    let columns: Vec<Column> = store
        .columns()
        .iter()
        .map(|col| {
            if !options.any() {
                return col.clone();
            }
            let cleaned = clean_values(&col.values, options);
            log::debug!(
                "column '{}': {} -> {} values",
                col.name,
                col.len(),
                cleaned.len()
            );
            Column::new(col.name.clone(), cleaned)
        })
        .collect();

    let next = store.derive(columns);
    log::info!(
        "Cleaned {} columns with {options:?} ({} -> {} rows)",
        next.num_columns(),
        store.row_count(),
        next.row_count()
    );
    next
}
