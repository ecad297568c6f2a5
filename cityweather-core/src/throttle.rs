//! Pacing for batch lookups against the upstream provider.

use governor::{
    Quota, RateLimiter as GovLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::{fmt, sync::Arc, time::Duration};

/// Spacing between city lookups in a batch.
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(200);

/// Allows one city lookup per `period`. A zero period disables pacing.
#[derive(Clone)]
pub struct Throttle {
    limiter: Option<Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    period: Duration,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(GovLimiter::direct(quota)));
        Self { limiter, period }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until the next lookup may start.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for Throttle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("period", &self.period)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_PAUSE)
    }
}
