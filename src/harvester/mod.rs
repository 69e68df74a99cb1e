//! Harvester module: the concurrent fetch/extract/aggregate pipeline
//!
//! This module contains the core harvesting logic, including:
//! - Bounded-concurrency worker pool
//! - HTTP fetching with a fixed browser-like request profile
//! - Field extraction with selector fallbacks and availability classification
//! - Fan-in collection of successes and failures
//! - Overall run coordination

mod collector;
mod coordinator;
mod extractor;
mod fetcher;
mod pool;
mod throttle;

pub use collector::{outcome_channel, CollectedOutcomes, Collector, OutcomeSender};
pub use coordinator::{run_harvest, Harvester};
pub use extractor::{
    classify_availability, image_links, AvailabilityRule, ExtractionRules, AVAILABILITY_RULES,
};
pub use fetcher::{build_http_client, Fetcher};
pub use pool::{PoolReport, WorkerPool};
pub use throttle::PolitenessDelay;

use crate::config::Config;
use crate::model::RunResult;
use crate::HarvestError;

/// Runs a complete harvest operation
///
/// This is the main entry point for starting a run. It will:
/// 1. Build the HTTP client and extraction rules
/// 2. Fetch every identifier through the worker pool
/// 3. Collect records and failures
/// 4. Write the configured outputs
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `identifiers` - Documents to fetch, in submission order
///
/// # Returns
///
/// * `Ok(RunResult)` - Run finished (individual fetches may still have failed)
/// * `Err(HarvestError)` - The run could not be set up
pub async fn harvest(config: Config, identifiers: &[String]) -> Result<RunResult, HarvestError> {
    run_harvest(config, identifiers).await
}
