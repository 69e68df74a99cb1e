//! Output module for persisting harvest results
//!
//! This module handles:
//! - Exporting records as JSON, an XLSX workbook, and a CSV table
//! - Writing a markdown run summary
//! - Dating output file names

mod json;
mod markdown;
mod table;
mod traits;
mod workbook;

pub use json::JsonSink;
pub use markdown::{format_markdown_summary, SummarySink};
pub use table::{write_table, TableSink};
pub use traits::{RecordSink, SinkError, SinkResult};
pub use workbook::{build_workbook, WorkbookSink};

use crate::config::OutputConfig;
use crate::model::RunResult;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Inserts `_YYYY-MM-DD` before the file extension
///
/// `books.json` becomes `books_2024-05-04.json`; a path without an extension
/// just gets the suffix appended.
pub fn dated_path(path: &Path, date: NaiveDate) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_{}", stem, date.format("%Y-%m-%d"));
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Resolves a configured output path, dating it if enabled
pub fn resolve_output_path(config: &OutputConfig, path: &str) -> PathBuf {
    let path = Path::new(path);
    if config.date_suffix {
        dated_path(path, chrono::Local::now().date_naive())
    } else {
        path.to_path_buf()
    }
}

/// Builds the sinks for a run
///
/// Record sinks are skipped when the run produced no records; the summary is
/// always written.
pub fn build_sinks(config: &OutputConfig, result: &RunResult) -> Vec<Box<dyn RecordSink>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    if !result.records.is_empty() {
        sinks.push(Box::new(JsonSink::new(resolve_output_path(
            config,
            &config.records_path,
        ))));
        sinks.push(Box::new(WorkbookSink::new(resolve_output_path(
            config,
            &config.workbook_path,
        ))));
        sinks.push(Box::new(TableSink::new(resolve_output_path(
            config,
            &config.table_path,
        ))));
    }

    sinks.push(Box::new(SummarySink::new(resolve_output_path(
        config,
        &config.summary_path,
    ))));

    sinks
}

/// Writes the run result to every sink
///
/// Each sink runs independently; one failing does not stop the rest.
pub fn write_outputs(
    config: &OutputConfig,
    result: &RunResult,
) -> Vec<(&'static str, SinkResult<PathBuf>)> {
    build_sinks(config, result)
        .iter()
        .map(|sink| (sink.name(), sink.write(result)))
        .collect()
}
