//! Fan-in collector for fetch outcomes
//!
//! Successes and failures travel on two separate bounded channels. The
//! collector is the only owner of the accumulated results and stops only
//! once both channels are closed, i.e. once every producer has dropped its
//! sender.

use crate::model::{FetchFailure, Outcome, Record};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Everything the collector received, in arrival order
#[derive(Debug, Default)]
pub struct CollectedOutcomes {
    pub records: Vec<Record>,
    pub failures: Vec<FetchFailure>,
}

/// Producer side: routes each outcome onto its channel
#[derive(Debug, Clone)]
pub struct OutcomeSender {
    records: mpsc::Sender<Record>,
    failures: mpsc::Sender<FetchFailure>,
}

impl OutcomeSender {
    /// Sends one outcome, waiting if the channel is momentarily full
    pub async fn deliver(&self, outcome: Outcome) {
        let sent = match outcome {
            Outcome::Parsed(record) => self.records.send(record).await.map_err(|e| e.0.identifier),
            Outcome::Failed(failure) => self
                .failures
                .send(failure)
                .await
                .map_err(|e| e.0.identifier),
        };

        if let Err(identifier) = sent {
            error!(%identifier, "collector is gone; outcome dropped");
        }
    }
}

/// Consumer side: drains both channels until both are closed
#[derive(Debug)]
pub struct Collector {
    records: mpsc::Receiver<Record>,
    failures: mpsc::Receiver<FetchFailure>,
}

/// Creates the two outcome channels, each holding up to `capacity` items
///
/// `capacity` should be at least the pool's concurrency ceiling so producers
/// do not block on a collector that is keeping up.
pub fn outcome_channel(capacity: usize) -> (OutcomeSender, Collector) {
    let capacity = capacity.max(1);
    let (records_tx, records_rx) = mpsc::channel(capacity);
    let (failures_tx, failures_rx) = mpsc::channel(capacity);

    (
        OutcomeSender {
            records: records_tx,
            failures: failures_tx,
        },
        Collector {
            records: records_rx,
            failures: failures_rx,
        },
    )
}

impl Collector {
    pub fn new(records: mpsc::Receiver<Record>, failures: mpsc::Receiver<FetchFailure>) -> Self {
        Self { records, failures }
    }

    /// Runs the collector on its own task
    pub fn spawn(self) -> JoinHandle<CollectedOutcomes> {
        tokio::spawn(self.drain())
    }

    /// Receives until both channels are closed
    pub async fn drain(mut self) -> CollectedOutcomes {
        let mut collected = CollectedOutcomes::default();
        let mut records_open = true;
        let mut failures_open = true;

        while records_open || failures_open {
            tokio::select! {
                received = self.records.recv(), if records_open => match received {
                    Some(record) => {
                        info!(
                            identifier = %record.identifier,
                            total_parsed = collected.records.len() + 1,
                            "Record parsed successfully"
                        );
                        collected.records.push(record);
                    }
                    None => records_open = false,
                },
                received = self.failures.recv(), if failures_open => match received {
                    Some(failure) => {
                        warn!(
                            identifier = %failure.identifier,
                            total_failed = collected.failures.len() + 1,
                            error = %failure.message,
                            "Failed to fetch record"
                        );
                        collected.failures.push(failure);
                    }
                    None => failures_open = false,
                },
            }
        }

        collected
    }
}
