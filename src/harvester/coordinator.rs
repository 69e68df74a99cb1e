//! Harvest coordinator - run orchestration logic
//!
//! Sequences one run:
//! 1. Build one fetch request per identifier
//! 2. Start the collector on its own task
//! 3. Push every request through the worker pool
//! 4. Close both outcome channels once every task has finished
//! 5. Wait for the collector to drain and freeze the run result
//! 6. Hand the result to the output sinks

use crate::config::Config;
use crate::harvester::collector::{outcome_channel, CollectedOutcomes};
use crate::harvester::fetcher::Fetcher;
use crate::harvester::pool::WorkerPool;
use crate::model::{FetchFailure, FetchRequest, Outcome, RunResult};
use crate::output::write_outputs;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Above this many simultaneous requests a warning is logged
const HIGH_CONCURRENCY: u32 = 100;

/// Main harvest coordinator structure
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    pool: WorkerPool,
}

impl Harvester {
    /// Creates a new harvester from a validated configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or a selector does not compile.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        if config.harvester.concurrency > HIGH_CONCURRENCY {
            warn!(
                concurrency = config.harvester.concurrency,
                "Concurrency is unusually high; the target site may throttle or block the run"
            );
        }

        let fetcher = Fetcher::new(&config)?;
        let pool = WorkerPool::new(config.harvester.concurrency as usize);

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            pool,
        })
    }

    /// Fetches every identifier and returns the frozen run result
    ///
    /// Never fails: per-request errors become failure entries in the result,
    /// and `records + failures == identifiers.len()` holds on return.
    pub async fn run(&self, identifiers: &[String]) -> RunResult {
        let started = Instant::now();
        let requests = FetchRequest::from_identifiers(&self.config.harvester.base_url, identifiers);
        let submitted = requests.len();

        info!(
            count = submitted,
            concurrency = self.pool.ceiling(),
            "Starting harvest run"
        );

        let (sender, collector) = outcome_channel(self.pool.ceiling());
        let collector = collector.spawn();

        let fetcher = Arc::clone(&self.fetcher);
        let task_sender = sender.clone();
        let report = self
            .pool
            .run(requests, move |request| {
                let fetcher = Arc::clone(&fetcher);
                let sender = task_sender.clone();
                async move {
                    let outcome = fetcher.fetch(&request).await;
                    sender.deliver(outcome).await;
                }
            })
            .await;

        // A task that died before delivering still owes its request an outcome
        for request in report.aborted {
            sender
                .deliver(Outcome::Failed(FetchFailure {
                    identifier: request.identifier,
                    url: request.url,
                    message: "fetch task aborted before completion".to_string(),
                }))
                .await;
        }

        // Every task sender is gone with the pool's worker; this closes both channels
        drop(sender);

        let collected = match collector.await {
            Ok(collected) => collected,
            Err(e) => {
                error!("collector task failed: {}", e);
                CollectedOutcomes::default()
            }
        };

        let result = RunResult {
            records: collected.records,
            failures: collected.failures,
            submitted,
            duration: started.elapsed(),
        };

        info!(
            submitted = result.submitted,
            succeeded = result.succeeded(),
            failed = result.failed(),
            duration = ?result.duration,
            "Harvest completed"
        );

        if !result.is_complete() {
            warn!(
                "Outcome count mismatch: {} records + {} failures != {} submitted",
                result.succeeded(),
                result.failed(),
                result.submitted
            );
        }

        result
    }

    /// Runs the harvest and writes the result to every configured sink
    ///
    /// Sink failures are logged and do not fail the run.
    pub async fn run_and_export(&self, identifiers: &[String]) -> RunResult {
        let result = self.run(identifiers).await;

        for (sink, written) in write_outputs(&self.config.output, &result) {
            match written {
                Ok(path) => info!(sink, file = %path.display(), "Results saved"),
                Err(e) => error!(sink, "Failed to save results: {}", e),
            }
        }

        result
    }
}

/// Runs a complete harvest operation
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::{load_config, load_identifiers};
/// use catalog_harvester::harvester::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let ids = load_identifiers(Path::new(&config.harvester.identifiers_file))?;
/// let result = run_harvest(config, &ids).await?;
/// println!("{} records", result.succeeded());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, identifiers: &[String]) -> Result<RunResult, HarvestError> {
    let harvester = Harvester::new(config)?;
    Ok(harvester.run_and_export(identifiers).await)
}
