use super::model::ColumnStore;
use super::selection::SelectionSet;

/// Default number of rows handed to the plot at once.
pub const DEFAULT_WINDOW_SIZE: usize = 10_000;

// ---------------------------------------------------------------------------
// Window – the row range a display currently shows
// ---------------------------------------------------------------------------

/// Half-open row range `[start, end)` over the current store.
///
/// The window is owned by the caller. After the store changes size it must
/// be re-clamped with [`Window::clamp`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `[0, min(size, total))`.
    pub fn initial(total: usize, size: usize) -> Self {
        Self::new(0, size.min(total))
    }

    /// Clamp both ends into `[0, total]`, never letting `start` pass `end`.
    pub fn clamp(self, total: usize) -> Self {
        let end = self.end.min(total);
        Self::new(self.start.min(end), end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shift by `delta` rows, keeping the length where `total` allows.
    pub fn pan(self, delta: isize, total: usize) -> Self {
        let len = self.len().min(total);
        let max_start = total - len;
        let start = self.start.saturating_add_signed(delta).min(max_start);
        Self::new(start, start + len)
    }

    /// Move so the window begins at `start`, keeping its length.
    pub fn scroll_to(self, start: usize, total: usize) -> Self {
        let len = self.len().min(total);
        let start = start.min(total - len);
        Self::new(start, start + len)
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// The part of `column` inside `window`, clamped to the column's length.
///
/// Unknown columns and out-of-range windows yield an empty slice.
pub fn project<'a>(store: &'a ColumnStore, column: &str, window: Window) -> &'a [f64] {
    let Some(values) = store.column(column) else {
        return &[];
    };
    let Window { start, end } = window.clamp(values.len());
    values.get(start..end).unwrap_or_default()
}

/// Paired `(x, y)` slices for a scatter plot, truncated to the shorter one.
pub fn project_pair<'a>(
    store: &'a ColumnStore,
    x: &str,
    y: &str,
    window: Window,
) -> (&'a [f64], &'a [f64]) {
    let xs = project(store, x, window);
    let ys = project(store, y, window);
    let n = xs.len().min(ys.len());
    (&xs[..n], &ys[..n])
}

/// Translate renderer-local point indices to global row indices.
///
/// Local indices at or past the window's length are dropped.
pub fn to_global_indices<I>(window: Window, local: I) -> SelectionSet
where
    I: IntoIterator<Item = usize>,
{
    let len = window.len();
    local
        .into_iter()
        .filter(|&i| i < len)
        .map(|i| window.start + i)
        .collect()
}
