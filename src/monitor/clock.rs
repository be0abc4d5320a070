// src/monitor/clock.rs
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::time::Instant;

/// Time source for the scheduler
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic seconds since an arbitrary fixed origin
    fn now(&self) -> f64;

    /// Wall-clock time used to stamp alerts
    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the tokio timer
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
