use thiserror::Error;

/// Failures raised by the pipeline. Cleaning, selection removal and windowing
/// are total and never produce one.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fewer than two columns kept at least one numeric value.
    #[error("file must contain at least two numeric columns (found {found})")]
    Schema { found: usize },
    #[error("malformed input: {0}")]
    Parse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no columns selected for export")]
    Export,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The ingestion was superseded or aborted before it finished.
    #[error("ingestion cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Whether this is one of the malformed-input failures.
    pub fn is_parse(&self) -> bool {
        matches!(self, PipelineError::Parse(_) | PipelineError::Csv(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
