//! JSON record export

use crate::model::RunResult;
use crate::output::traits::{RecordSink, SinkResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes records as a pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, result: &RunResult) -> SinkResult<PathBuf> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &result.records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Availability, Record};
    use tempfile::tempdir;

    #[test]
    fn test_writes_records_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");

        let mut record = Record::empty("123456", "https://example.com/books/123456");
        record.title = "Title".to_string();
        record.availability = Availability::LimitedStock;
        record.image_links = vec!["https://img/123456/cover.jpg".to_string()];

        let result = RunResult {
            records: vec![record],
            submitted: 1,
            ..Default::default()
        };

        let written = JsonSink::new(&path).write(&result).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["id"], "123456");
        assert_eq!(parsed[0]["title"], "Title");
        assert_eq!(parsed[0]["availability"], "Ограниченное количество");
        assert_eq!(parsed[0]["image_links"][0], "https://img/123456/cover.jpg");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let sink = JsonSink::new("/nonexistent/dir/books.json");
        assert!(sink.write(&RunResult::default()).is_err());
    }
}
