//! Fixed-interval pacing between detail-page fetches

use std::time::Duration;

/// Blocks the crawl for a fixed interval after each detail fetch
///
/// Listing and category fetches are never paced; only item extraction calls
/// [`Throttle::pace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits out the configured interval
    pub async fn pace(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_millis(500)
    }
}
