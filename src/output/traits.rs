//! Output sink trait and errors
//!
//! A sink receives the frozen run result once, after every request has
//! produced its outcome, and persists it in its own format.

use crate::model::RunResult;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for output operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for output sinks
pub trait RecordSink {
    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Persists the run result
    ///
    /// # Returns
    ///
    /// The path that was written
    fn write(&self, result: &RunResult) -> SinkResult<PathBuf>;
}
