//! Data model for a harvest run
//!
//! # Components
//!
//! - `Record`/`Availability`: the fields extracted from one document
//! - `FetchRequest`/`Outcome`/`FetchFailure`: one unit of work and its single result
//! - `FetchState`/`FetchTracker`: per-request lifecycle
//! - `RunResult`: the final, immutable aggregation handed to sinks

mod fetch_state;
mod outcome;
mod record;

// Re-export main types
pub use fetch_state::{FetchState, FetchTracker};
pub use outcome::{document_url, FetchFailure, FetchRequest, Outcome, RunResult};
pub use record::{Availability, Record};
