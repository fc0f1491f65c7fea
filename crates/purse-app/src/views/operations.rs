//! Per-operation loading and error flags
//!
//! Every user-triggered load owns one [`OperationKey`]. While it runs the
//! key reports `loading`; if it fails the key carries a short, user-facing
//! error. Frontends render a scoped spinner or inline error per key without
//! blocking the rest of the screen.
//!
//! Loading is cleared by dropping the [`OperationGuard`], so every exit path
//! (success, `?`, early return, cancelled future) resets the flag. Several
//! operations may share a key (page 2 and page 3 of one list); the key stays
//! loading until the last of their guards is dropped.

use futures_signals::signal::{Mutable, Signal};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ============================================================================
// Keys
// ============================================================================

/// Closed set of operations that expose loading/error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationKey {
    /// Root load of the bill list
    ReloadBills,
    /// Page advance of the bill list
    LoadMoreBills,
    /// Root load of the message inbox
    ReloadMessages,
    /// Page advance of the message inbox
    LoadMoreMessages,
    /// Receive options for the selected network
    ReceiveOptions,
    /// Transfer options for the selected network
    TransferOptions,
    /// Order submission
    CreateOrder,
    /// Waiting for an order to materialize
    AwaitOrder,
    /// Deposit address allocation
    CreateAddress,
}

impl OperationKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::ReloadBills,
        Self::LoadMoreBills,
        Self::ReloadMessages,
        Self::LoadMoreMessages,
        Self::ReceiveOptions,
        Self::TransferOptions,
        Self::CreateOrder,
        Self::AwaitOrder,
        Self::CreateAddress,
    ];

    /// Stable name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReloadBills => "reload_bills",
            Self::LoadMoreBills => "load_more_bills",
            Self::ReloadMessages => "reload_messages",
            Self::LoadMoreMessages => "load_more_messages",
            Self::ReceiveOptions => "receive_options",
            Self::TransferOptions => "transfer_options",
            Self::CreateOrder => "create_order",
            Self::AwaitOrder => "await_order",
            Self::CreateAddress => "create_address",
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Flags
// ============================================================================

/// Observable state of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Whether the operation is in flight
    pub loading: bool,
    /// User-facing message from the last failure, cleared on restart
    pub error: Option<String>,
}

/// Loading/error map keyed by [`OperationKey`].
#[derive(Debug, Default)]
pub struct OperationFlags {
    statuses: Mutable<BTreeMap<OperationKey, OperationStatus>>,
    /// Live guards per key
    live: Mutex<HashMap<OperationKey, usize>>,
}

impl OperationFlags {
    /// Create a map with every key idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` loading and clear its previous error.
    pub fn begin(&self, key: OperationKey) -> OperationGuard<'_> {
        let mut live = self.live.lock();
        let count = live.entry(key).or_default();
        *count += 1;
        {
            let mut statuses = self.statuses.lock_mut();
            let status = statuses.entry(key).or_default();
            status.loading = true;
            status.error = None;
        }
        tracing::trace!(%key, live = *count, "operation started");
        OperationGuard { flags: self, key }
    }

    /// Record a user-facing failure message on `key`.
    pub fn fail(&self, key: OperationKey, message: impl Into<String>) {
        self.statuses.lock_mut().entry(key).or_default().error = Some(message.into());
    }

    /// Clear the error on `key`.
    pub fn clear_error(&self, key: OperationKey) {
        if let Some(status) = self.statuses.lock_mut().get_mut(&key) {
            status.error = None;
        }
    }

    /// Current state of `key`.
    pub fn get(&self, key: OperationKey) -> OperationStatus {
        self.statuses.lock_ref().get(&key).cloned().unwrap_or_default()
    }

    /// Whether any operation is in flight.
    pub fn any_loading(&self) -> bool {
        self.statuses.lock_ref().values().any(|status| status.loading)
    }

    /// Snapshot of every key that has ever run.
    pub fn snapshot(&self) -> BTreeMap<OperationKey, OperationStatus> {
        self.statuses.get_cloned()
    }

    /// Signal of the whole map for reactive frontends.
    pub fn signal(&self) -> impl Signal<Item = BTreeMap<OperationKey, OperationStatus>> {
        self.statuses.signal_cloned()
    }

    fn finish(&self, key: OperationKey) {
        let mut live = self.live.lock();
        let Some(count) = live.get_mut(&key) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return;
        }
        live.remove(&key);
        if let Some(status) = self.statuses.lock_mut().get_mut(&key) {
            status.loading = false;
        }
        tracing::trace!(%key, "operation finished");
    }
}

/// Scoped hold on one loading key; the last live guard clears `loading` on drop.
#[derive(Debug)]
#[must_use = "dropping the guard immediately clears the loading flag"]
pub struct OperationGuard<'a> {
    flags: &'a OperationFlags,
    key: OperationKey,
}

impl OperationGuard<'_> {
    /// The key this guard owns.
    pub fn key(&self) -> OperationKey {
        self.key
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.flags.finish(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_sets_and_clears_loading() {
        let flags = OperationFlags::new();
        {
            let _guard = flags.begin(OperationKey::ReloadBills);
            assert!(flags.get(OperationKey::ReloadBills).loading);
            assert!(flags.any_loading());
        }
        assert!(!flags.get(OperationKey::ReloadBills).loading);
        assert!(!flags.any_loading());
    }

    #[test]
    fn test_loading_cleared_on_error_path() {
        fn run(flags: &OperationFlags) -> Result<(), String> {
            let _guard = flags.begin(OperationKey::CreateAddress);
            flags.fail(OperationKey::CreateAddress, "limit reached");
            Err("limit reached".to_string())
        }

        let flags = OperationFlags::new();
        assert!(run(&flags).is_err());
        assert_eq!(
            flags.get(OperationKey::CreateAddress),
            OperationStatus {
                loading: false,
                error: Some("limit reached".to_string()),
            }
        );
    }

    #[test]
    fn test_restart_clears_previous_error() {
        let flags = OperationFlags::new();
        flags.fail(OperationKey::ReloadBills, "offline");

        let _guard = flags.begin(OperationKey::ReloadBills);
        assert_eq!(flags.get(OperationKey::ReloadBills).error, None);
    }

    #[test]
    fn test_older_guard_does_not_clear_newer_loading() {
        let flags = OperationFlags::new();
        let old = flags.begin(OperationKey::ReloadBills);
        let new = flags.begin(OperationKey::ReloadBills);

        drop(old);
        assert!(flags.get(OperationKey::ReloadBills).loading);

        drop(new);
        assert!(!flags.get(OperationKey::ReloadBills).loading);
    }

    #[test]
    fn test_key_loading_until_last_guard_drops() {
        let flags = OperationFlags::new();
        let page_2 = flags.begin(OperationKey::LoadMoreBills);
        let page_3 = flags.begin(OperationKey::LoadMoreBills);

        // Page 3 finishes first; page 2 is still in flight
        drop(page_3);
        assert!(flags.get(OperationKey::LoadMoreBills).loading);

        drop(page_2);
        assert!(!flags.get(OperationKey::LoadMoreBills).loading);
    }

    #[test]
    fn test_keys_are_independent() {
        let flags = OperationFlags::new();
        let _bills = flags.begin(OperationKey::ReloadBills);
        assert!(!flags.get(OperationKey::ReloadMessages).loading);
        assert_eq!(flags.snapshot().len(), 1);
    }

    #[test]
    fn test_all_keys_have_distinct_names() {
        let mut names: Vec<_> = OperationKey::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OperationKey::ALL.len());
    }
}
