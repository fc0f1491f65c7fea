//! Generation tokens for staleness detection.
//!
//! Every logical stream (a list, a selection, an inbox) owns a counter that
//! only ever increases. A root request bumps the counter and captures the new
//! value; when its response arrives the captured value is compared against
//! the live one and the response is dropped if anything newer has started.
//!
//! Comparison is against the *current* counter, never against arrival order,
//! so responses that come back out of order are still resolved correctly.
//!
//! Append-style requests capture with [`GenerationCounter::current`] instead
//! of bumping, which lets a concurrent reset invalidate them too.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A captured generation value for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation<K> {
    stream: K,
    value: u64,
}

impl<K: Copy> Generation<K> {
    /// Stream this generation belongs to.
    pub fn stream(&self) -> K {
        self.stream
    }

    /// Raw counter value at capture time.
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl<K: fmt::Debug> fmt::Display for Generation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.stream, self.value)
    }
}

/// Per-stream monotonically increasing counters.
///
/// Streams never share a counter, so bumping one stream can never invalidate
/// work on another.
#[derive(Debug)]
pub struct GenerationCounter<K> {
    counters: Mutex<HashMap<K, u64>>,
}

impl<K> Default for GenerationCounter<K> {
    fn default() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> GenerationCounter<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Create a counter set with every stream at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new root request on `stream` and capture its generation.
    pub fn begin(&self, stream: K) -> Generation<K> {
        self.begin_with(stream, || ()).0
    }

    /// Bump `stream` and run `reset` before any other writer can observe
    /// the new generation.
    ///
    /// `reset` runs while the counter lock is held and must not call back
    /// into this counter.
    pub fn begin_with<R>(&self, stream: K, reset: impl FnOnce() -> R) -> (Generation<K>, R) {
        let mut counters = self.counters.lock();
        let value = counters.entry(stream).or_insert(0);
        *value += 1;
        let generation = Generation {
            stream,
            value: *value,
        };
        let output = reset();
        tracing::trace!(%generation, "generation advanced");
        (generation, output)
    }

    /// Capture the live generation of `stream` without bumping it.
    pub fn current(&self, stream: K) -> Generation<K> {
        let counters = self.counters.lock();
        Generation {
            stream,
            value: counters.get(&stream).copied().unwrap_or(0),
        }
    }

    /// Whether `generation` is still the live generation of its stream.
    pub fn is_current(&self, generation: &Generation<K>) -> bool {
        let counters = self.counters.lock();
        Self::matches(&counters, generation)
    }

    /// Run `apply` only if `generation` is still current.
    ///
    /// The check and the mutation happen under one lock, so a concurrent
    /// [`begin`](Self::begin) either lands entirely before (and the apply is
    /// skipped) or entirely after (and its reset overwrites the apply).
    /// `apply` must not call back into this counter.
    pub fn apply_if_current<R>(
        &self,
        generation: &Generation<K>,
        apply: impl FnOnce() -> R,
    ) -> Option<R> {
        let counters = self.counters.lock();
        if Self::matches(&counters, generation) {
            Some(apply())
        } else {
            tracing::debug!(%generation, "dropping stale response");
            None
        }
    }

    fn matches(counters: &HashMap<K, u64>, generation: &Generation<K>) -> bool {
        counters.get(&generation.stream).copied().unwrap_or(0) == generation.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Stream {
        Bills,
        Network,
    }

    #[test]
    fn test_begin_increments_and_never_resets() {
        let counter = GenerationCounter::new();
        let first = counter.begin(Stream::Bills);
        let second = counter.begin(Stream::Bills);

        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
        assert!(!counter.is_current(&first));
        assert!(counter.is_current(&second));
    }

    #[test]
    fn test_streams_are_independent() {
        let counter = GenerationCounter::new();
        let bills = counter.begin(Stream::Bills);
        let _network = counter.begin(Stream::Network);
        let _network = counter.begin(Stream::Network);

        assert!(counter.is_current(&bills));
        assert_eq!(counter.current(Stream::Network).value(), 2);
    }

    #[test]
    fn test_current_does_not_bump() {
        let counter = GenerationCounter::new();
        let root = counter.begin(Stream::Bills);
        let append = counter.current(Stream::Bills);

        assert_eq!(root, append);
        assert!(counter.is_current(&append));
    }

    #[test]
    fn test_append_capture_invalidated_by_reset() {
        let counter = GenerationCounter::new();
        counter.begin(Stream::Bills);
        let append = counter.current(Stream::Bills);

        counter.begin(Stream::Bills);
        assert_eq!(counter.apply_if_current(&append, || "appended"), None);
    }

    #[test]
    fn test_apply_if_current_runs_for_live_generation() {
        let counter = GenerationCounter::new();
        let generation = counter.begin(Stream::Network);
        assert_eq!(counter.apply_if_current(&generation, || 7), Some(7));
    }

    #[test]
    fn test_cascaded_loads_reuse_first_token() {
        let counter = GenerationCounter::new();
        let g = counter.begin(Stream::Network);

        // First dependent load lands while g is live
        assert!(counter.apply_if_current(&g, || ()).is_some());

        // User switches again before the second dependent load lands
        let _g2 = counter.begin(Stream::Network);
        assert!(counter.apply_if_current(&g, || ()).is_none());
    }

    #[test]
    fn test_begin_with_runs_reset_under_new_generation() {
        let counter = GenerationCounter::new();
        let old = counter.begin(Stream::Bills);
        let (new, observed_old_live) = counter.begin_with(Stream::Bills, || 42);

        assert_eq!(observed_old_live, 42);
        assert!(!counter.is_current(&old));
        assert!(counter.is_current(&new));
    }

    proptest! {
        /// N root requests issued before any response: whatever order the
        /// responses arrive in, only the last request's response applies.
        #[test]
        fn prop_only_latest_root_request_applies(
            n in 1usize..12,
            order in proptest::collection::vec(any::<u32>(), 12),
        ) {
            let counter = GenerationCounter::new();
            let tokens: Vec<_> = (0..n).map(|_| counter.begin(Stream::Bills)).collect();

            let mut arrival: Vec<usize> = (0..n).collect();
            arrival.sort_by_key(|i| order[*i]);

            let mut applied = Vec::new();
            for i in arrival {
                if counter.apply_if_current(&tokens[i], || ()).is_some() {
                    applied.push(i);
                }
            }

            prop_assert_eq!(applied, vec![n - 1]);
        }
    }
}
