//! Purse Core - Request Coordination Primitives
//!
//! This crate provides the small set of primitives that keep long-lived,
//! UI-bound state consistent while overlapping asynchronous requests are in
//! flight. It contains no HTTP, no view code and no runtime: effects such as
//! sleeping and spawning are consumed through traits so every primitive can be
//! driven by tokio in production and by a paused clock in tests.
//!
//! # Primitives
//!
//! - [`GenerationCounter`]: per-stream epochs that discard stale responses
//! - [`SingleFlightGate`]: at most one in-flight operation per gate token
//! - [`BoundedPoller`]: fixed-interval probing with cooperative cancellation
//! - [`EphemeralNotifier`]: self-dismissing toasts with identity-checked timers
//!
//! # Effect Interfaces
//!
//! - [`TimeEffects`]: monotonic clock and sleep
//! - [`TaskSpawner`]: fire-and-forget background tasks
//! - [`CancellationToken`]: cooperative cancellation signal

#![forbid(unsafe_code)]

/// Cooperative cancellation tokens
pub mod cancel;

/// Effect traits consumed by the primitives
pub mod effects;

/// Unified error handling
pub mod errors;

/// Single-flight gate for deduplicating in-flight operations
pub mod gate;

/// Generation tokens for staleness detection
pub mod generation;

/// Ephemeral toast notifications
pub mod notifier;

/// Bounded polling of asynchronously materializing resources
pub mod poll;

pub use cancel::CancelToken;
pub use effects::{CancellationToken, TaskSpawner, TimeEffects};
pub use errors::{CoreError, CoreResult};
pub use gate::{GateLease, GateToken, SingleFlightGate};
pub use generation::{Generation, GenerationCounter};
pub use notifier::{EphemeralNotifier, ToastEntry, ToastId, ToastTheme, DEFAULT_TOAST_DURATION_MS};
pub use poll::{BoundedPoller, PollError, PollPolicy, PollState, Probe};

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use futures::future::BoxFuture;

    use crate::effects::{TaskSpawner, TimeEffects};

    /// Tokio-backed clock; honours `start_paused` test runtimes.
    pub struct TokioClock {
        origin: tokio::time::Instant,
    }

    impl TokioClock {
        pub fn new() -> Self {
            Self {
                origin: tokio::time::Instant::now(),
            }
        }
    }

    #[async_trait]
    impl TimeEffects for TokioClock {
        fn now_ms(&self) -> u64 {
            self.origin.elapsed().as_millis() as u64
        }

        async fn sleep_ms(&self, ms: u64) {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }

    pub struct TokioSpawner;

    impl TaskSpawner for TokioSpawner {
        fn spawn(&self, fut: BoxFuture<'static, ()>) {
            tokio::spawn(fut);
        }
    }
}
