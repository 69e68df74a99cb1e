//! Requests, per-request outcomes, and the aggregated run result

use crate::model::Record;
use crate::HarvestError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One unit of work: a document to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub identifier: String,
    /// Derived as `{base_url}/{identifier}`
    pub url: String,
    /// 1-based position in the input list, for progress reporting only
    pub ordinal: usize,
    pub total: usize,
}

impl FetchRequest {
    /// Builds one request per identifier, in input order
    pub fn from_identifiers(base_url: &str, identifiers: &[String]) -> Vec<Self> {
        let total = identifiers.len();
        identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| Self {
                identifier: identifier.clone(),
                url: document_url(base_url, identifier),
                ordinal: index + 1,
                total,
            })
            .collect()
    }

    /// Progress label in the form `n/total`
    pub fn progress(&self) -> String {
        format!("{}/{}", self.ordinal, self.total)
    }
}

/// Derives the document URL for an identifier
pub fn document_url(base_url: &str, identifier: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), identifier)
}

/// A failed request with its cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub identifier: String,
    pub url: String,
    pub message: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing {}: {}", self.identifier, self.message)
    }
}

/// The single terminal result of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Parsed(Record),
    Failed(FetchFailure),
}

impl Outcome {
    /// Wraps a fetch/extract result for `request`
    pub fn from_result(request: &FetchRequest, result: Result<Record, HarvestError>) -> Self {
        match result {
            Ok(record) => Self::Parsed(record),
            Err(e) => Self::Failed(FetchFailure {
                identifier: request.identifier.clone(),
                url: request.url.clone(),
                message: e.to_string(),
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Parsed(record) => &record.identifier,
            Self::Failed(failure) => &failure.identifier,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Final aggregation of one run, handed to the sinks
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Records in arrival order
    pub records: Vec<Record>,
    pub failures: Vec<FetchFailure>,
    pub submitted: usize,
    pub duration: Duration,
}

impl RunResult {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if every submitted request produced exactly one outcome
    pub fn is_complete(&self) -> bool {
        self.succeeded() + self.failed() == self.submitted
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.submitted == 0 {
            return 0.0;
        }
        (self.succeeded() as f64 / self.submitted as f64) * 100.0
    }

    /// Widest image link list across all records
    pub fn max_image_links(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.image_links.len())
            .max()
            .unwrap_or(0)
    }
}
