//! Single-flight gate.
//!
//! The gate is the set of currently held tokens. A token such as
//! `"bill.page.3"` identifies one logical operation; while it is held any
//! duplicate attempt is rejected outright rather than queued. This is how a
//! burst of "scrolled near bottom" triggers for the same page collapses into
//! one network call.
//!
//! Prefer [`SingleFlightGate::try_acquire`]: the returned [`GateLease`]
//! releases the token when dropped, so success, `?` propagation, early
//! returns and a dropped future all release it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Identity of one deduplicated operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateToken {
    id: String,
}

impl GateToken {
    /// Create a token from an arbitrary identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Token for advancing `list` to `page`, rendered `"<list>.page.<page>"`.
    pub fn page(list: &str, page: u32) -> Self {
        Self::new(format!("{list}.page.{page}"))
    }

    /// The identity string.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for GateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Default)]
struct GateState {
    /// Held tokens and the lease that currently owns each.
    held: HashMap<GateToken, u64>,
    next_lease: u64,
}

/// Set of currently held gate tokens.
#[derive(Debug, Default)]
pub struct SingleFlightGate {
    state: Mutex<GateState>,
}

impl SingleFlightGate {
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `token` held if it is free. Returns `false` with no other effect
    /// if it is already held.
    pub fn begin(&self, token: &GateToken) -> bool {
        self.acquire(token).is_some()
    }

    /// Release `token` unconditionally. Idempotent.
    pub fn end(&self, token: &GateToken) {
        self.state.lock().held.remove(token);
    }

    /// Release every token.
    ///
    /// Used when the list reloads from page one and every in-flight page
    /// advance is void. Outstanding leases become inert: dropping them later
    /// will not release a token re-acquired after the reset.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if !state.held.is_empty() {
            tracing::debug!(released = state.held.len(), "gate reset");
        }
        state.held.clear();
    }

    /// Whether `token` is currently held.
    pub fn is_held(&self, token: &GateToken) -> bool {
        self.state.lock().held.contains_key(token)
    }

    /// Number of tokens currently held.
    pub fn held_count(&self) -> usize {
        self.state.lock().held.len()
    }

    /// Acquire `token` for the lifetime of the returned lease.
    pub fn try_acquire(&self, token: GateToken) -> Option<GateLease<'_>> {
        let lease = self.acquire(&token)?;
        Some(GateLease {
            gate: self,
            token,
            lease,
        })
    }

    fn acquire(&self, token: &GateToken) -> Option<u64> {
        let mut state = self.state.lock();
        if state.held.contains_key(token) {
            tracing::debug!(%token, "gate rejected duplicate");
            return None;
        }
        state.next_lease += 1;
        let lease = state.next_lease;
        state.held.insert(token.clone(), lease);
        Some(lease)
    }

    fn release(&self, token: &GateToken, lease: u64) {
        let mut state = self.state.lock();
        if state.held.get(token) == Some(&lease) {
            state.held.remove(token);
        }
    }
}

/// Scoped hold on a gate token; releases on drop.
#[derive(Debug)]
pub struct GateLease<'a> {
    gate: &'a SingleFlightGate,
    token: GateToken,
    lease: u64,
}

impl GateLease<'_> {
    /// The held token.
    pub fn token(&self) -> &GateToken {
        &self.token
    }
}

impl Drop for GateLease<'_> {
    fn drop(&mut self) {
        self.gate.release(&self.token, self.lease);
    }
}
