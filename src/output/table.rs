//! Tabular (CSV) record export
//!
//! One row per record with a fixed set of leading columns, followed by one
//! `Картинка_N` column per image up to the widest image list in the run.
//! The same layout is used by the workbook sink.

use crate::model::{Record, RunResult};
use crate::output::traits::{RecordSink, SinkResult};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const BASE_HEADERS: [&str; 5] = ["Ссылка", "Название", "ID", "Наличие", "Цена"];

/// Writes records as a comma-separated table
#[derive(Debug, Clone)]
pub struct TableSink {
    path: PathBuf,
}

impl TableSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for TableSink {
    fn name(&self) -> &'static str {
        "table"
    }

    fn write(&self, result: &RunResult) -> SinkResult<PathBuf> {
        write_table(File::create(&self.path)?, result)?;
        Ok(self.path.clone())
    }
}

/// Writes the header row and one row per record
pub fn write_table<W: Write>(w: W, result: &RunResult) -> SinkResult<()> {
    let image_columns = result.max_image_links();
    let mut writer = Writer::from_writer(w);

    writer.write_record(header_row(image_columns))?;
    for record in &result.records {
        writer.write_record(record_row(record, image_columns))?;
    }

    writer.flush()?;
    Ok(())
}

/// Column titles for a table with `image_columns` image columns
pub(super) fn header_row(image_columns: usize) -> Vec<String> {
    let mut header: Vec<String> = BASE_HEADERS.iter().map(|h| h.to_string()).collect();
    header.extend((1..=image_columns).map(|n| format!("Картинка_{}", n)));
    header
}

/// One record padded out to the full table width
pub(super) fn record_row(record: &Record, image_columns: usize) -> Vec<String> {
    let mut row = vec![
        record.url.clone(),
        record.title.clone(),
        record.identifier.clone(),
        record.availability.label().to_string(),
        record.price.clone(),
    ];
    row.extend(record.image_links.iter().cloned());
    row.resize(BASE_HEADERS.len() + image_columns, String::new());
    row
}
