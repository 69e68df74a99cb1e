//! Bounded-concurrency worker pool
//!
//! This module handles:
//! - Admission control via a counting semaphore (at most `ceiling` tasks in flight)
//! - Launching one task per request, in input order
//! - Waiting for every launched task to finish
//!
//! Submitting the `ceiling + 1`-th task blocks until an earlier task releases
//! its permit. Tasks are independent: one failing or panicking never cancels
//! the others.

use crate::model::FetchRequest;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// What happened to the tasks of one pool run
#[derive(Debug, Default)]
pub struct PoolReport {
    /// Tasks that ran to completion
    pub completed: usize,

    /// Requests whose task panicked or was cancelled before finishing
    pub aborted: Vec<FetchRequest>,
}

impl PoolReport {
    pub fn launched(&self) -> usize {
        self.completed + self.aborted.len()
    }
}

/// Runs one task per request with a fixed concurrency ceiling
pub struct WorkerPool {
    /// Acquired and released only; never inspected for value
    permits: Arc<Semaphore>,
    ceiling: usize,
}

impl WorkerPool {
    /// Creates a pool; a ceiling of zero is raised to one
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            permits: Arc::new(Semaphore::new(ceiling)),
            ceiling,
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Launches `worker` once per request and waits for all of them
    ///
    /// Each task holds a permit for its whole lifetime, so no more than
    /// `ceiling` workers ever run at once. A progress event
    /// (`identifier`, `progress = n/total`) is emitted as each task starts.
    pub async fn run<F, Fut>(&self, requests: Vec<FetchRequest>, worker: F) -> PoolReport
    where
        F: Fn(FetchRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let worker = Arc::new(worker);
        let mut handles: Vec<(FetchRequest, JoinHandle<()>)> = Vec::with_capacity(requests.len());

        for request in requests {
            // The semaphore is owned by the pool and never closed
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                error!("worker pool semaphore closed; stopping submission");
                break;
            };

            info!(
                identifier = %request.identifier,
                url = %request.url,
                progress = %request.progress(),
                "Starting to fetch"
            );

            let worker = Arc::clone(&worker);
            let task_request = request.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                worker(task_request).await;
            });
            handles.push((request, handle));
        }

        let mut report = PoolReport::default();
        for (request, handle) in handles {
            match handle.await {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    error!(identifier = %request.identifier, "fetch task did not finish: {}", e);
                    report.aborted.push(request);
                }
            }
        }

        report
    }
}
