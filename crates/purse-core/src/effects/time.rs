//! Time effect trait.

use async_trait::async_trait;
use std::sync::Arc;

/// Monotonic clock and sleep.
///
/// `now_ms` is measured from an arbitrary, handler-defined origin; callers
/// only ever compare two readings from the same handler.
#[async_trait]
pub trait TimeEffects: Send + Sync {
    /// Milliseconds elapsed since the handler's origin.
    fn now_ms(&self) -> u64;

    /// Suspend the current task for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64);
}

#[async_trait]
impl<T: TimeEffects + ?Sized> TimeEffects for Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    async fn sleep_ms(&self, ms: u64) {
        (**self).sleep_ms(ms).await;
    }
}
