//! Orders Workflow - Submission and Materialization
//!
//! An accepted order is created by a background job on the server, so the
//! client polls `fetch_order` until the record resolves:
//!
//! | `status` | meaning                     | probe    |
//! |----------|-----------------------------|----------|
//! | 1        | exists, awaiting settlement | resolved |
//! | 2        | failed                      | failed   |
//! | other    | still being produced        | pending  |
//!
//! A 404 while the record does not exist yet counts as pending. Only one
//! poll runs per coordinator: tracking a new order cancels the previous
//! poll, which then ends silently.

use purse_core::{BoundedPoller, CancelToken, PollPolicy, Probe, ToastTheme};

use crate::bridge::{Order, OrderId, OrderRequest, OrderStatus};
use crate::core::{AppCore, StreamId};
use crate::errors::AppError;
use crate::views::OperationKey;
use crate::workflows::surface;

/// Poll `order_id` until it materializes, fails, runs out of attempts or
/// `cancel` fires.
///
/// **What it does**: probes the order under `policy`, reporting failures on
/// [`OperationKey::AwaitOrder`]; a poll whose token was cancelled while a
/// probe was in flight ends as `PollCancelled` without a report
/// **Returns**: the materialized order; `PollExhausted`, `PollFailed` and
/// `PollCancelled` are distinct errors, and only cancellation stays silent
pub async fn await_materialization(
    app: &AppCore,
    order_id: &OrderId,
    policy: PollPolicy,
    cancel: &CancelToken,
) -> Result<Order, AppError> {
    poll_order(app, order_id, policy, cancel)
        .await
        .map_err(|err| settle_failure(app, order_id, err, cancel.is_cancelled()))
}

/// Track `order_id` as the coordinator's single active poll.
///
/// Cancels any poll already running. The resolved order is published to
/// [`AppCore::last_order`] unless a newer order was tracked meanwhile. A
/// poll superseded that way ends as `PollCancelled`, whatever its last
/// probe returned, and never reaches the user.
pub async fn track_order(app: &AppCore, order_id: &OrderId) -> Result<Order, AppError> {
    let policy = app.config().poll_policy()?;
    let generation = app.generations().begin(StreamId::Orders);
    let cancel = app.install_poll();

    let result = poll_order(app, order_id, policy, &cancel).await;
    app.release_poll(&cancel);
    let order = result.map_err(|err| {
        let superseded = cancel.is_cancelled() || !app.is_current(&generation);
        settle_failure(app, order_id, err, superseded)
    })?;

    let published = app.generations().apply_if_current(&generation, || {
        app.views().last_order.set(Some(order.clone()));
    });
    if published.is_some() {
        tracing::info!(%order_id, "order materialized");
        app.notify("Order created", ToastTheme::Success);
    }
    Ok(order)
}

/// Submit an order, then track it until it materializes.
pub async fn submit_order(app: &AppCore, request: OrderRequest) -> Result<Order, AppError> {
    let ticket = {
        let _guard = app.operations().begin(OperationKey::CreateOrder);
        app.api()
            .create_order(&request)
            .await
            .map_err(|err| surface(app, OperationKey::CreateOrder, err))?
    };
    tracing::info!(order_id = %ticket.order_id, network = %request.network, "order accepted");
    track_order(app, &ticket.order_id).await
}

/// Cancel the active poll. Returns `false` if none was running.
pub fn cancel_pending(app: &AppCore) -> bool {
    let cancelled = app.cancel_active_poll();
    if cancelled {
        tracing::debug!("order poll cancelled by user");
    }
    cancelled
}

async fn poll_order(
    app: &AppCore,
    order_id: &OrderId,
    policy: PollPolicy,
    cancel: &CancelToken,
) -> Result<Order, AppError> {
    let _guard = app.operations().begin(OperationKey::AwaitOrder);
    tracing::debug!(
        %order_id,
        max_attempts = policy.max_attempts,
        interval_ms = policy.interval_ms,
        "awaiting order"
    );

    let poller = BoundedPoller::new(app.time(), policy);
    poller
        .poll(|| probe_order(app, order_id), cancel)
        .await
        .map_err(AppError::from)
}

/// Report a poll failure, or swallow it as `PollCancelled` once the poll
/// has been abandoned.
fn settle_failure(app: &AppCore, order_id: &OrderId, err: AppError, abandoned: bool) -> AppError {
    if abandoned {
        tracing::debug!(%order_id, error = %err, "dropping failure of abandoned poll");
        return AppError::PollCancelled;
    }
    surface(app, OperationKey::AwaitOrder, err)
}

async fn probe_order(app: &AppCore, order_id: &OrderId) -> Probe<Order, AppError> {
    match app.api().fetch_order(order_id).await {
        Ok(order) => match order.status() {
            OrderStatus::Pending => Probe::Resolved(order),
            OrderStatus::Failed => Probe::Failed(AppError::PollFailed {
                reason: order
                    .failure_reason
                    .unwrap_or_else(|| format!("order {order_id} failed")),
            }),
            OrderStatus::Processing => Probe::Pending,
        },
        Err(err) if err.is_not_found() => Probe::Pending,
        Err(err) => Probe::Failed(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::NetworkId;
    use crate::test_support::test_app;

    #[tokio::test(start_paused = true)]
    async fn test_submit_order_resolves_and_publishes() {
        let app = test_app();
        let request = OrderRequest {
            network: NetworkId::new("TRON"),
            asset: "USDT".to_string(),
            amount_minor: 1_000,
        };

        let order = submit_order(&app, request).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(app.last_order(), Some(order));
        assert!(!app.has_active_poll());
        assert!(!app.operation(OperationKey::AwaitOrder).loading);
        assert_eq!(app.toast().map(|t| t.theme), Some(ToastTheme::Success));
    }

    #[tokio::test]
    async fn test_cancel_pending_without_poll() {
        let app = test_app();
        assert!(!cancel_pending(&app));
    }
}
