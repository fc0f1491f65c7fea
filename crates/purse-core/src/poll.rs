//! Bounded polling of asynchronously materializing resources.
//!
//! Some server operations return before the resource they create exists
//! (an order is accepted, then materialized by a background job). The
//! [`BoundedPoller`] probes such a resource at a fixed interval up to a fixed
//! number of attempts, returning as soon as the probe reports a terminal
//! state.
//!
//! Cancellation is cooperative and checked at both suspension points: before
//! every probe and before every sleep. The sleep itself races the
//! cancellation signal, so a cancel requested mid-sleep ends the loop
//! immediately instead of after one more probe.

use futures::future::{self, Either};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::effects::{CancellationToken, TimeEffects};
use crate::errors::{CoreError, CoreResult};

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T, E> {
    /// The resource reached its final, successful state.
    Resolved(T),
    /// The resource is not ready yet; probe again after the interval.
    Pending,
    /// The resource reported an unrecoverable failure.
    Failed(E),
}

/// Attempt budget and spacing for a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Maximum number of probes before giving up
    pub max_attempts: u32,
    /// Delay between consecutive probes in milliseconds
    pub interval_ms: u64,
}

impl PollPolicy {
    /// Default attempt budget.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;
    /// Default delay between probes.
    pub const DEFAULT_INTERVAL_MS: u64 = 2_000;

    /// Create a policy, rejecting a zero attempt budget.
    pub fn new(max_attempts: u32, interval_ms: u64) -> CoreResult<Self> {
        if max_attempts == 0 {
            return Err(CoreError::invalid("max_attempts must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            interval_ms,
        })
    }

    /// Worst-case wall time spent sleeping between probes.
    pub fn total_sleep_ms(&self) -> u64 {
        u64::from(self.max_attempts.saturating_sub(1)) * self.interval_ms
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            interval_ms: Self::DEFAULT_INTERVAL_MS,
        }
    }
}

/// Progress snapshot handed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    /// Probes made so far
    pub attempt: u32,
    /// Probe budget
    pub max_attempts: u32,
    /// Delay between probes in milliseconds
    pub interval_ms: u64,
    /// Whether cancellation has been observed
    pub cancelled: bool,
}

/// Why a poll ended without a resolved value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError<E> {
    /// Every attempt found the resource still pending
    #[error("resource still pending after {attempts} attempts")]
    Exhausted {
        /// Probes made
        attempts: u32,
    },

    /// The probe reported an explicit failure
    #[error("resource failed: {0}")]
    Failed(E),

    /// The caller cancelled the poll
    #[error("poll cancelled after {attempts} attempts")]
    Cancelled {
        /// Probes made before cancellation was observed
        attempts: u32,
    },
}

/// Fixed-interval, fixed-budget poller.
pub struct BoundedPoller<'a, Time: ?Sized> {
    time: &'a Time,
    policy: PollPolicy,
}

impl<'a, Time> BoundedPoller<'a, Time>
where
    Time: TimeEffects + ?Sized,
{
    /// Create a poller that sleeps through `time`.
    pub fn new(time: &'a Time, policy: PollPolicy) -> Self {
        Self { time, policy }
    }

    /// The policy this poller enforces.
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Probe until resolved, failed, exhausted or cancelled.
    pub async fn poll<T, E, F, Fut, C>(&self, probe: F, cancel: &C) -> Result<T, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Probe<T, E>>,
        C: CancellationToken + ?Sized,
    {
        self.poll_with_progress(probe, cancel, |_| {}).await
    }

    /// Like [`poll`](Self::poll), reporting [`PollState`] after every probe
    /// and when cancellation is observed.
    pub async fn poll_with_progress<T, E, F, Fut, C, P>(
        &self,
        mut probe: F,
        cancel: &C,
        mut progress: P,
    ) -> Result<T, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Probe<T, E>>,
        C: CancellationToken + ?Sized,
        P: FnMut(&PollState),
    {
        let mut state = PollState {
            attempt: 0,
            max_attempts: self.policy.max_attempts,
            interval_ms: self.policy.interval_ms,
            cancelled: false,
        };

        // Policies built by hand or deserialized can bypass `PollPolicy::new`
        if state.max_attempts == 0 {
            tracing::debug!("poll has no attempt budget");
            return Err(PollError::Exhausted { attempts: 0 });
        }

        loop {
            if cancel.is_cancelled() {
                return Err(Self::cancelled(&mut state, &mut progress));
            }

            let outcome = probe().await;
            state.attempt += 1;
            progress(&state);

            match outcome {
                Probe::Resolved(value) => {
                    tracing::debug!(attempt = state.attempt, "poll resolved");
                    return Ok(value);
                }
                Probe::Failed(error) => {
                    tracing::debug!(attempt = state.attempt, "poll failed");
                    return Err(PollError::Failed(error));
                }
                Probe::Pending => {}
            }

            if state.attempt >= state.max_attempts {
                tracing::debug!(attempts = state.attempt, "poll exhausted");
                return Err(PollError::Exhausted {
                    attempts: state.attempt,
                });
            }

            if cancel.is_cancelled() {
                return Err(Self::cancelled(&mut state, &mut progress));
            }

            let sleep = self.time.sleep_ms(state.interval_ms);
            let cancelled = cancel.cancelled();
            futures::pin_mut!(sleep, cancelled);
            if let Either::Right(_) = future::select(sleep, cancelled).await {
                return Err(Self::cancelled(&mut state, &mut progress));
            }
        }
    }

    fn cancelled<E, P>(state: &mut PollState, progress: &mut P) -> PollError<E>
    where
        P: FnMut(&PollState),
    {
        state.cancelled = true;
        progress(state);
        tracing::debug!(attempts = state.attempt, "poll cancelled");
        PollError::Cancelled {
            attempts: state.attempt,
        }
    }
}
