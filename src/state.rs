use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::clean::{clean_store, CleaningOptions};
use crate::data::export::{export_csv, write_csv};
use crate::data::ingest::{IngestOutcome, IngestQueue, Source};
use crate::data::selection::{remove_rows, SelectionSet};
use crate::data::window::{project_pair, to_global_indices, Window};
use crate::data::{ColumnStore, LoadedDataset};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
///
/// Everything the pipeline needs (cleaning options, window, selection) is
/// passed from here into the pure `data` functions; the results replace the
/// stored dataset wholesale.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<LoadedDataset>,

    /// Column plotted on x; its length is the row count the window pages over.
    pub x_column: Option<String>,
    pub y_column: Option<String>,

    /// Rows currently handed to the plot.
    pub window: Window,

    pub cleaning: CleaningOptions,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    /// Dragging on the plot selects points for removal instead of panning.
    pub select_mode: bool,

    pub settings: Settings,

    ingest: IngestQueue,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            dataset: None,
            x_column: None,
            y_column: None,
            window: Window::default(),
            cleaning: settings.cleaning,
            status_message: None,
            loading: false,
            select_mode: false,
            settings,
            ingest: IngestQueue::new(),
        }
    }

    pub fn store(&self) -> Option<&ColumnStore> {
        self.dataset.as_ref().map(|ds| &ds.store)
    }

    /// Column names available for the axis selectors and export.
    pub fn columns(&self) -> &[String] {
        self.dataset
            .as_ref()
            .map(|ds| ds.schema.names())
            .unwrap_or_default()
    }

    /// Number of rows in the x column.
    pub fn total_points(&self) -> usize {
        match (self.store(), &self.x_column) {
            (Some(store), Some(x)) => store.len_of(x),
            _ => 0,
        }
    }

    // -- ingestion --

    /// Start loading `path` in the background, superseding any pending load.
    pub fn open_path(&mut self, path: PathBuf) {
        self.submit(Source::File(path));
    }

    pub fn open_text(&mut self, text: String) {
        self.submit(Source::Text(text));
    }

    fn submit(&mut self, source: Source) {
        self.status_message = None;
        match self.ingest.submit(source, self.settings.ingest.clone()) {
            Ok(_) => self.loading = true,
            Err(e) => {
                log::error!("Failed to start ingestion: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    /// Apply a finished background load, if there is one. Returns whether
    /// anything changed.
    pub fn poll_ingest(&mut self) -> bool {
        match self.ingest.poll() {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Block until the pending load (if any) finishes and apply it.
    pub fn wait_ingest(&mut self) {
        if let Some(outcome) = self.ingest.wait() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: IngestOutcome) {
        self.loading = false;
        match outcome.result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                // The previous dataset stays as it was.
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Install a newly loaded dataset: first two columns on the axes, window
    /// at the start.
    pub fn set_dataset(&mut self, dataset: LoadedDataset) {
        let names = dataset.schema.names();
        self.x_column = names.first().cloned();
        self.y_column = names.get(1).cloned();
        self.dataset = Some(dataset);
        self.window = Window::initial(self.total_points(), self.settings.window_size);
        self.status_message = None;
        self.loading = false;
        log::info!(
            "Loaded {} points, showing {:?}",
            self.total_points(),
            self.window
        );
    }

    // -- axes & window --

    /// Switch the x axis. The window keeps its start and is resized to the
    /// configured length over the new column.
    pub fn set_x_column(&mut self, column: String) {
        if !self.has_column(&column) {
            log::warn!("ignoring unknown x column '{column}'");
            return;
        }
        self.x_column = Some(column);
        let total = self.total_points();
        self.window = Window::initial(total, self.settings.window_size)
            .scroll_to(self.window.start, total);
    }

    pub fn set_y_column(&mut self, column: String) {
        if !self.has_column(&column) {
            log::warn!("ignoring unknown y column '{column}'");
            return;
        }
        self.y_column = Some(column);
    }

    fn has_column(&self, name: &str) -> bool {
        self.dataset
            .as_ref()
            .is_some_and(|ds| ds.schema.contains(name))
    }

    pub fn pan_window(&mut self, delta: isize) {
        self.window = self.window.pan(delta, self.total_points());
    }

    pub fn scroll_window_to(&mut self, start: usize) {
        self.window = self.window.scroll_to(start, self.total_points());
    }

    fn reclamp_window(&mut self) {
        let total = self.total_points();
        self.window = self.window.clamp(total);
        // A window squeezed empty by shrinking data reopens at the tail.
        if self.window.is_empty() && total > 0 {
            let len = self.settings.window_size.min(total);
            self.window = Window::new(total - len, total);
        }
    }

    /// The `(x, y)` slices inside the window.
    pub fn visible_points(&self) -> (&[f64], &[f64]) {
        match (self.store(), &self.x_column, &self.y_column) {
            (Some(store), Some(x), Some(y)) => project_pair(store, x, y, self.window),
            _ => (&[][..], &[][..]),
        }
    }

    // -- cleaning & removal --

    /// Run the configured filters and replace the dataset with the result.
    pub fn clean(&mut self) {
        let Some(dataset) = self.dataset.as_mut() else {
            return;
        };
        dataset.store = clean_store(&dataset.store, &self.cleaning);
        self.reclamp_window();
    }

    /// Remove points picked on the plot, given as indices into the window.
    pub fn remove_window_selection(&mut self, local: impl IntoIterator<Item = usize>) {
        let global = to_global_indices(self.window, local);
        self.remove_rows(&global);
    }

    /// Remove rows by global index from every column.
    pub fn remove_rows(&mut self, selection: &SelectionSet) {
        if selection.is_empty() {
            return;
        }
        let Some(dataset) = self.dataset.as_mut() else {
            return;
        };
        dataset.store = remove_rows(&dataset.store, selection);
        self.reclamp_window();
    }

    // -- export --

    pub fn export_text(&self) -> Result<String> {
        let dataset = self.dataset.as_ref().context("no dataset loaded")?;
        Ok(export_csv(&dataset.store, dataset.schema.names())?)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let dataset = self.dataset.as_ref().context("no dataset loaded")?;
        write_csv(path, &dataset.store, dataset.schema.names())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_str, IngestOptions};

    fn loaded(text: &str) -> AppState {
        let mut state = AppState::new(Settings {
            window_size: 4,
            ..Settings::default()
        });
        state.set_dataset(parse_str(text, &IngestOptions::default()).unwrap());
        state
    }

    const XY: &str = "x,y,z\n1,10,0\n2,20,-1\n3,30,5\n4,40,0\n5,50,7\n6,60,8\n";

    #[test]
    fn new_dataset_picks_first_two_columns() {
        let state = loaded(XY);
        assert_eq!(state.x_column.as_deref(), Some("x"));
        assert_eq!(state.y_column.as_deref(), Some("y"));
        assert_eq!(state.total_points(), 6);
        assert_eq!(state.window, Window::new(0, 4));
        assert_eq!(state.visible_points().0, &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn window_selection_is_translated_to_global_rows() {
        let mut state = loaded(XY);
        state.pan_window(2);
        assert_eq!(state.window, Window::new(2, 6));
        // local 0 and 2 are global rows 2 and 4
        state.remove_window_selection([0, 2]);
        let store = state.store().unwrap();
        assert_eq!(store.column("x"), Some(&[1.0, 2.0, 4.0, 6.0][..]));
        assert_eq!(store.column("z"), Some(&[0.0, -1.0, 0.0, 8.0][..]));
        assert_eq!(state.total_points(), 4);
        assert_eq!(state.window, Window::new(2, 4));
    }

    #[test]
    fn cleaning_recomputes_total_from_x() {
        let mut state = loaded(XY);
        state.set_x_column("z".into());
        state.cleaning.remove_zeros = true;
        state.cleaning.remove_negatives = true;
        state.clean();
        assert_eq!(state.total_points(), 3);
        assert_eq!(state.window, Window::new(0, 3));
        assert_eq!(state.store().unwrap().len_of("x"), 6);
    }

    #[test]
    fn switching_to_a_longer_x_column_regrows_the_window() {
        let mut state = loaded(XY);
        state.pan_window(1);
        state.set_x_column("z".into());
        state.cleaning.remove_zeros = true;
        state.cleaning.remove_negatives = true;
        state.clean();
        assert_eq!(state.window, Window::new(1, 3));

        state.set_x_column("x".into());
        assert_eq!(state.total_points(), 6);
        assert_eq!(state.window, Window::new(1, 5));
    }

    #[test]
    fn unknown_axis_names_are_ignored() {
        let mut state = loaded(XY);
        state.set_x_column("nope".into());
        state.set_y_column("nope".into());
        assert_eq!(state.x_column.as_deref(), Some("x"));
        assert_eq!(state.y_column.as_deref(), Some("y"));
        assert_eq!(state.window, Window::new(0, 4));
    }

    #[test]
    fn emptied_window_reopens_at_tail() {
        let mut state = loaded(XY);
        state.pan_window(2);
        state.remove_rows(&(0..5).collect());
        assert_eq!(state.total_points(), 1);
        assert_eq!(state.window, Window::new(0, 1));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded(XY);
        state.open_text("only,text\na,b\n".into());
        assert!(state.loading);
        state.wait_ingest();
        assert!(!state.loading);
        assert!(state.status_message.as_deref().unwrap().contains("two numeric columns"));
        assert_eq!(state.total_points(), 6);
        assert_eq!(state.columns().len(), 3);
    }

    #[test]
    fn background_load_replaces_dataset() {
        let mut state = loaded(XY);
        state.open_text("a,b\n1,2\n".into());
        state.wait_ingest();
        assert_eq!(state.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(state.x_column.as_deref(), Some("a"));
        assert_eq!(state.window, Window::new(0, 1));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn export_uses_schema_order() {
        let mut state = loaded("x,y\n1,2\n0,3\n");
        state.cleaning.remove_zeros = true;
        state.clean();
        assert_eq!(state.export_text().unwrap(), "x,y\n1,2\n,3");
    }

    #[test]
    fn nothing_loaded() {
        let mut state = AppState::default();
        state.clean();
        state.remove_window_selection([0]);
        assert_eq!(state.total_points(), 0);
        assert!(state.visible_points().0.is_empty());
        assert!(state.export_text().is_err());
    }
}
