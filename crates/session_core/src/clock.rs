use std::time::Duration;

use async_trait::async_trait;

/// Timer seam for the staged pipeline. Production code sleeps on the tokio
/// timer; tests substitute a recording fake or run under paused time to walk
/// the full sequence without waiting out the real delays.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed clock used everywhere outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
