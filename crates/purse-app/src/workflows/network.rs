//! Network Workflow - Active Network Selection
//!
//! Selecting a network is a root request on
//! [`StreamId::NetworkSelection`]. The choice is applied synchronously, then
//! two dependent option lists load in sequence:
//!
//! ```text
//! Idle ─select─► apply choice ─► receive options ─► transfer options ─► Idle
//!                    │                 │ stale              │ stale
//!                    ▼                 ▼                    ▼
//!               generation g        drop, Idle          drop, Idle
//! ```
//!
//! Both loads check the generation captured at selection time. A second
//! selection while either load is in flight leaves the first sequence's
//! completions as no-ops.

use crate::bridge::NetworkInfo;
use crate::core::{AppCore, StreamId};
use crate::errors::AppError;
use crate::views::OperationKey;
use crate::workflows::paging::settle;
use crate::workflows::LoadOutcome;

/// Switch the active network and load its receive and transfer options.
///
/// **What it does**: applies `network`, then loads receive options, then transfer options
/// **Returns**: `Applied` once both lists are set, or the first drop/failure
pub async fn select_network(app: &AppCore, network: NetworkInfo) -> Result<LoadOutcome, AppError> {
    let id = network.id.clone();
    let views = app.views();
    let (generation, ()) = app
        .generations()
        .begin_with(StreamId::NetworkSelection, || views.network.lock_mut().select(network));
    tracing::info!(network = %id, %generation, "network selected");

    let outcome = {
        let _guard = app.operations().begin(OperationKey::ReceiveOptions);
        let result = app.api().fetch_receive_options(&id).await;
        settle(app, OperationKey::ReceiveOptions, &generation, result, |options| {
            views.network.lock_mut().receive_options = options;
            true
        })?
    };
    if !outcome.is_applied() {
        return Ok(outcome);
    }

    // Same token as the primary load, never a fresh read
    let _guard = app.operations().begin(OperationKey::TransferOptions);
    let result = app.api().fetch_transfer_options(&id).await;
    settle(app, OperationKey::TransferOptions, &generation, result, |options| {
        views.network.lock_mut().transfer_options = options;
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{network, test_app};

    #[tokio::test]
    async fn test_select_network_loads_both_lists() {
        let app = test_app();
        let outcome = select_network(&app, network("TRON")).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);

        let state = app.network();
        assert_eq!(state.selected.map(|n| n.id.0).as_deref(), Some("TRON"));
        assert_eq!(state.receive_options.len(), 1);
        assert_eq!(state.transfer_options.len(), 1);
        assert!(!app.operation(OperationKey::TransferOptions).loading);
    }
}
