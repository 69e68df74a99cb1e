//! Spreadsheet (XLSX) record export
//!
//! Same columns as the CSV table, on a single `Sheet1` worksheet with a
//! bold header row.

use crate::model::RunResult;
use crate::output::table::{header_row, record_row};
use crate::output::traits::{RecordSink, SinkError, SinkResult};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Writes records as an `.xlsx` workbook
#[derive(Debug, Clone)]
pub struct WorkbookSink {
    path: PathBuf,
}

impl WorkbookSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for WorkbookSink {
    fn name(&self) -> &'static str {
        "workbook"
    }

    fn write(&self, result: &RunResult) -> SinkResult<PathBuf> {
        let mut workbook = build_workbook(result)?;
        workbook.save(&self.path)?;
        Ok(self.path.clone())
    }
}

/// Builds the in-memory workbook for a run
pub fn build_workbook(result: &RunResult) -> SinkResult<Workbook> {
    let image_columns = result.max_image_links();
    let bold = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, title) in header_row(image_columns).iter().enumerate() {
        worksheet.write_string_with_format(0, column(col)?, title, &bold)?;
    }

    for (index, record) in result.records.iter().enumerate() {
        write_cells(worksheet, row(index + 1)?, &record_row(record, image_columns))?;
    }

    Ok(workbook)
}

/// Writes the non-empty cells of one row
fn write_cells(worksheet: &mut Worksheet, row: RowNum, cells: &[String]) -> SinkResult<()> {
    for (col, value) in cells.iter().enumerate() {
        if !value.is_empty() {
            worksheet.write_string(row, column(col)?, value)?;
        }
    }
    Ok(())
}

fn column(index: usize) -> SinkResult<ColNum> {
    ColNum::try_from(index)
        .map_err(|_| SinkError::Format(format!("column {} does not fit in a worksheet", index)))
}

fn row(index: usize) -> SinkResult<RowNum> {
    RowNum::try_from(index)
        .map_err(|_| SinkError::Format(format!("row {} does not fit in a worksheet", index)))
}
