use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::clean::CleaningOptions;
use crate::data::loader::IngestOptions;
use crate::data::window::DEFAULT_WINDOW_SIZE;

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV: &str = "RUSTY_SCRUB_CONFIG";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Viewer settings. Every field falls back to its default when missing.
///
/// ```json
/// {
///   "cleaning": { "removeOutliers": true, "removeZeros": false, "removeNegatives": false },
///   "ingest": { "delimiter": ";", "row_policy": "drop_incomplete_rows" },
///   "window_size": 5000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cleaning: CleaningOptions,
    pub ingest: IngestOptions,
    /// Rows shown in the plot at once.
    pub window_size: usize,
    /// Suggested name in the export dialog.
    pub export_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cleaning: CleaningOptions::default(),
            ingest: IngestOptions::default(),
            window_size: DEFAULT_WINDOW_SIZE,
            export_file_name: "cleaned_data.csv".into(),
        }
    }
}

impl Settings {
    /// Load from `$RUSTY_SCRUB_CONFIG` if set, otherwise use defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(&PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text).context("parsing settings JSON")?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing settings")
    }

    /// A zero window or chunk size would stall paging and cancellation, and
    /// the CSV reader only splits on single-byte delimiters.
    fn sanitized(mut self) -> Self {
        if self.window_size == 0 {
            log::warn!("window_size 0 in settings, using {DEFAULT_WINDOW_SIZE}");
            self.window_size = DEFAULT_WINDOW_SIZE;
        }
        if self.ingest.chunk_size == 0 {
            self.ingest.chunk_size = IngestOptions::default().chunk_size;
        }
        if !self.ingest.delimiter.is_ascii() {
            let fallback = IngestOptions::default().delimiter;
            log::warn!(
                "delimiter {:?} in settings is not ASCII, using {fallback:?}",
                self.ingest.delimiter
            );
            self.ingest.delimiter = fallback;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::RowPolicy;

    #[test]
    fn missing_fields_take_defaults() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.window_size, 10_000);
        assert_eq!(s.ingest.delimiter, ',');
    }

    #[test]
    fn cleaning_keys_are_camel_case() {
        let s = Settings::from_json(
            r#"{"cleaning": {"removeOutliers": true, "removeNegatives": true}}"#,
        )
        .unwrap();
        assert!(s.cleaning.remove_outliers);
        assert!(!s.cleaning.remove_zeros);
        assert!(s.cleaning.remove_negatives);
    }

    #[test]
    fn ingest_options() {
        let s = Settings::from_json(
            r#"{"ingest": {"delimiter": ";", "row_policy": "drop_incomplete_rows"}, "window_size": 0}"#,
        )
        .unwrap();
        assert_eq!(s.ingest.delimiter, ';');
        assert_eq!(s.ingest.row_policy, RowPolicy::DropIncompleteRows);
        assert_eq!(s.window_size, DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn delimiter_is_written_as_a_string() {
        let json = Settings::default().to_json().unwrap();
        assert!(json.contains(r#""delimiter": ",""#), "{json}");

        let s = Settings::from_json(r#"{"ingest": {"delimiter": "é"}}"#).unwrap();
        assert_eq!(s.ingest.delimiter, ',');
    }

    #[test]
    fn json_round_trip() {
        let mut s = Settings::default();
        s.cleaning.remove_zeros = true;
        s.export_file_name = "out.csv".into();
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Settings::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("settings.json"));
    }
}
