//! Tokio time handler.

use async_trait::async_trait;
use purse_core::TimeEffects;
use std::time::Duration;
use tokio::time::{self, Instant};

/// Real time handler for production use.
///
/// Built on `tokio::time`, so a runtime started with a paused clock drives
/// it deterministically.
#[derive(Debug, Clone)]
pub struct TokioTimeHandler {
    origin: Instant,
}

impl TokioTimeHandler {
    /// Create a handler whose `now_ms` origin is the moment of creation.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioTimeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimeEffects for TokioTimeHandler {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    async fn sleep_ms(&self, ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }
}
