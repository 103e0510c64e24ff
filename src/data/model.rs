use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Column – one named numeric series
// ---------------------------------------------------------------------------

/// A single named column. Values sit behind an `Arc` so a derived store can
/// reuse the columns a transform left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Arc<[f64]>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ColumnStore – the whole dataset, column-oriented
// ---------------------------------------------------------------------------

/// Column name → ordered numeric sequence, in input column order.
///
/// Stores are values: cleaning and selection removal build a new store with
/// `generation` bumped by one, so a consumer holding a window can tell the
/// data under it changed size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStore {
    columns: Vec<Column>,
    generation: u64,
}

impl ColumnStore {
    /// Build a fresh store (generation 0). A later column with a name already
    /// seen replaces the earlier one in place.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut deduped: Vec<Column> = Vec::with_capacity(columns.len());
        for col in columns {
            match deduped.iter_mut().find(|c| c.name == col.name) {
                Some(existing) => *existing = col,
                None => deduped.push(col),
            }
        }
        Self {
            columns: deduped,
            generation: 0,
        }
    }

    /// Build the successor of `self` from transformed columns.
    pub fn derive(&self, columns: Vec<Column>) -> Self {
        let mut next = Self::new(columns);
        next.generation = self.generation + 1;
        next
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &*c.values)
    }

    /// Length of the named column, 0 when absent.
    pub fn len_of(&self, name: &str) -> usize {
        self.column(name).map_or(0, <[f64]>::len)
    }

    /// Length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether every column has the same length.
    pub fn is_aligned(&self) -> bool {
        let mut lens = self.columns.iter().map(Column::len);
        match lens.next() {
            Some(first) => lens.all(|l| l == first),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – the column names that survived ingestion
// ---------------------------------------------------------------------------

/// Ordered names of the columns kept by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema(Vec<String>);

impl Schema {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

// ---------------------------------------------------------------------------
// LoadedDataset – result of one successful ingestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub store: ColumnStore,
    pub schema: Schema,
    /// Data records read from the input, excluding the header.
    pub rows_read: usize,
}
