use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use crate::config::secs_to_duration;
use crate::error::Result;

/// Throttle applied between consecutive page requests.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Waits a fixed duration between pages to stay under upstream rate limits.
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Negative delays clamp to zero. Infinite or overflowing delays are rejected.
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        Ok(Self::new(secs_to_duration("pacing delay", secs)?))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayPacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Pacer for FixedDelayPacer {
    async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!("Pacing, waiting {:?}", self.delay);
        sleep(self.delay).await;
    }
}
