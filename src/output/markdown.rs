//! Markdown run summary generation
//!
//! This module generates a human-readable markdown summary of a harvest run,
//! including counts, the availability breakdown, and the failure list.

use crate::model::{Availability, RunResult};
use crate::output::traits::{RecordSink, SinkResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the run summary as markdown
#[derive(Debug, Clone)]
pub struct SummarySink {
    path: PathBuf,
}

impl SummarySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for SummarySink {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn write(&self, result: &RunResult) -> SinkResult<PathBuf> {
        let markdown = format_markdown_summary(result);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(self.path.clone())
    }
}

/// Formats a run result as markdown
pub fn format_markdown_summary(result: &RunResult) -> String {
    let mut md = String::new();

    md.push_str("# Catalog-Harvester Run Summary\n\n");

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Submitted**: {}\n", result.submitted));
    md.push_str(&format!("- **Succeeded**: {}\n", result.succeeded()));
    md.push_str(&format!("- **Failed**: {}\n", result.failed()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        result.success_rate()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        result.duration.as_secs_f64()
    ));

    if !result.records.is_empty() {
        md.push_str("## Availability Breakdown\n\n");
        md.push_str("| Availability | Count |\n");
        md.push_str("|--------------|-------|\n");
        for availability in [
            Availability::InStock,
            Availability::LimitedStock,
            Availability::OutOfStock,
            Availability::Expected,
        ] {
            let count = result
                .records
                .iter()
                .filter(|r| r.availability == availability)
                .count();
            md.push_str(&format!("| {} | {} |\n", availability.label(), count));
        }

        let purchasable = result
            .records
            .iter()
            .filter(|r| r.availability.is_purchasable())
            .count();
        let without_price = result.records.iter().filter(|r| r.price.is_empty()).count();
        let without_title = result.records.iter().filter(|r| r.title.is_empty()).count();
        md.push('\n');
        md.push_str(&format!("- **Purchasable**: {}\n", purchasable));
        md.push_str(&format!("- **Records without title**: {}\n", without_title));
        md.push_str(&format!("- **Records without price**: {}\n\n", without_price));
    }

    if !result.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| ID | URL | Error |\n");
        md.push_str("|----|-----|-------|\n");
        for failure in &result.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.identifier,
                failure.url,
                failure.message.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchFailure, Record};
    use std::time::Duration;

    fn sample_result() -> RunResult {
        let mut expected = Record::empty("2", "u2");
        expected.availability = Availability::Expected;
        expected.title = "Title".to_string();

        RunResult {
            records: vec![Record::empty("1", "u1"), expected],
            failures: vec![FetchFailure {
                identifier: "3".to_string(),
                url: "https://example.com/books/3".to_string(),
                message: "Unexpected status 404 for 3".to_string(),
            }],
            submitted: 3,
            duration: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_summary_counts() {
        let md = format_markdown_summary(&sample_result());
        assert!(md.contains("- **Submitted**: 3"));
        assert!(md.contains("- **Succeeded**: 2"));
        assert!(md.contains("- **Failed**: 1"));
        assert!(md.contains("- **Success Rate**: 66.67%"));
        assert!(md.contains("- **Duration**: 1.50 seconds"));
    }

    #[test]
    fn test_summary_breakdown_and_failures() {
        let md = format_markdown_summary(&sample_result());
        assert!(md.contains("| В наличии | 1 |"));
        assert!(md.contains("| Ожидается | 1 |"));
        assert!(md.contains("- **Purchasable**: 1"));
        assert!(md.contains("- **Records without title**: 1"));
        assert!(md.contains("| 3 | https://example.com/books/3 | Unexpected status 404 for 3 |"));
    }

    #[test]
    fn test_empty_run_summary() {
        let md = format_markdown_summary(&RunResult::default());
        assert!(md.contains("- **Submitted**: 0"));
        assert!(!md.contains("## Failures"));
        assert!(!md.contains("## Availability Breakdown"));
    }
}
