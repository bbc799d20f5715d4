use std::sync::Mutex;
use std::time::Duration;

use tokio::time::{sleep, Instant};

pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);

/// Enforces a minimum interval between consecutive fetches.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until `interval` has passed since the previous call returned.
    /// The first call never waits.
    pub async fn ready(&self) {
        let wait = {
            let last = self.last.lock().unwrap_or_else(|p| p.into_inner());
            (*last).map(|at| self.interval.saturating_sub(at.elapsed()))
        };
        if let Some(wait) = wait.filter(|w| !w.is_zero()) {
            sleep(wait).await;
        }
        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = Some(Instant::now());
    }
}
