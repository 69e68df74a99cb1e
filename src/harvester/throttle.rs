//! Politeness delay applied before each request to the target domain
//!
//! This is a fixed random pause, not a backoff: every request waits a
//! uniformly random duration in `[0, max_delay)` and nothing is carried over
//! between requests, so concurrent tasks never share state here.

use rand::Rng;
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct PolitenessDelay {
    max_delay: Duration,
}

impl PolitenessDelay {
    pub fn new(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    /// A bound under one millisecond never waits
    pub fn is_disabled(&self) -> bool {
        self.max_delay.as_millis() == 0
    }

    /// Draws the pause for one request
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self) -> Duration {
        if self.is_disabled() {
            return Duration::ZERO;
        }
        let max_ms = self.max_delay.as_millis() as u64;
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(0..max_ms))
    }

    /// Sleeps for a freshly drawn pause
    pub async fn wait(&self, domain: &str) {
        if self.is_disabled() {
            return;
        }
        let pause = self.sample();
        trace!(domain, delay_ms = pause.as_millis() as u64, "politeness delay");
        tokio::time::sleep(pause).await;
    }
}
