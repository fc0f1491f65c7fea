//! # Workflows - Portable Business Logic
//!
//! Multi-step operations that are portable across every frontend. Each
//! workflow is a free async function taking `&AppCore`.
//!
//! ## Design Patterns
//!
//! **1. Capture, Call, Check-then-Apply**
//! - Capture a generation (bumping it for root loads) or acquire a gate lease
//! - Await the `WalletApi` call with no lock held
//! - Apply the result through `GenerationCounter::apply_if_current`
//!
//! **2. Scoped Loading Flags**
//! - Every workflow holds an `OperationGuard` for its key, so loading is
//!   cleared on every exit path
//!
//! **3. Error Handling**
//! - Current failures are reported through `AppCore::report` and returned
//! - Stale responses and rejected gate tokens return
//!   `Ok(LoadOutcome::Dropped(..))`; they are never errors

pub mod address;
pub mod bills;
pub mod messages;
pub mod network;
pub mod orders;
mod paging;

use serde::{Deserialize, Serialize};

use crate::core::AppCore;
use crate::errors::AppError;
use crate::views::OperationKey;

/// Result of a load that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOutcome {
    /// The response was current and mutated view state
    Applied,
    /// The load was discarded without side effects
    Dropped(DropReason),
}

impl LoadOutcome {
    /// Whether the response reached view state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a load was discarded. Pure control flow, never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// A newer request on the same stream superseded this one
    StaleResponse,
    /// The same page of the same list is already in flight
    GateRejected,
}

/// Convert, report and return a failure of `key`.
pub(crate) fn surface(app: &AppCore, key: OperationKey, err: impl Into<AppError>) -> AppError {
    let err = err.into();
    app.report(key, &err);
    err
}
