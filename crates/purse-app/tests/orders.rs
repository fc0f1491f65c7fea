//! Order materialization polling.

use assert_matches::assert_matches;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use purse_app::workflows::orders;
use purse_app::{
    ApiError, AppConfig, AppError, CancelToken, NetworkId, OperationKey, OrderId, OrderRequest,
    OrderStatus, PollPolicy, ToastTheme,
};
use purse_testkit::{failed_order, pending_order, processing_order, ticket, TestApp};

fn order_id() -> OrderId {
    OrderId::new("order-1")
}

fn request() -> OrderRequest {
    OrderRequest {
        network: NetworkId::new("TRON"),
        asset: "USDT".to_string(),
        amount_minor: 1_000,
    }
}

#[tokio::test(start_paused = true)]
async fn test_always_pending_exhausts_after_max_attempts() {
    let t = TestApp::new();
    t.api.fetch_order.always(Ok(processing_order("order-1")));

    let started = Instant::now();
    let err = orders::track_order(&t.app, &order_id()).await.unwrap_err();

    assert_eq!(err, AppError::PollExhausted { attempts: 15 });
    assert_eq!(t.api.fetch_order.call_count(), 15);
    // 14 sleeps of 2000 ms between 15 probes
    assert_eq!(started.elapsed(), Duration::from_millis(28_000));

    let toast = t.app.toast().unwrap();
    assert_eq!(toast.theme, ToastTheme::Info);
    assert_eq!(toast.message, "Still processing, please check again shortly");
    assert!(!t.app.has_active_poll());
}

#[tokio::test(start_paused = true)]
async fn test_resolves_on_third_probe() {
    let t = TestApp::new();
    t.api
        .fetch_order
        .push(Ok(processing_order("order-1")))
        .push(Ok(processing_order("order-1")))
        .always(Ok(pending_order("order-1")));

    let started = Instant::now();
    let order = orders::track_order(&t.app, &order_id()).await.unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(t.api.fetch_order.call_count(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(4_000));
    assert_eq!(t.app.last_order(), Some(order));
    assert!(!t.app.operation(OperationKey::AwaitOrder).loading);
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_stops_immediately() {
    let t = TestApp::new();
    t.api
        .fetch_order
        .push(Ok(processing_order("order-1")))
        .push(Ok(failed_order("order-1")));

    let err = orders::track_order(&t.app, &order_id()).await.unwrap_err();

    assert_matches!(err, AppError::PollFailed { ref reason } if reason == "rejected");
    assert_eq!(t.api.fetch_order.call_count(), 2);
    assert_eq!(t.app.toast().map(|toast| toast.theme), Some(ToastTheme::Error));
    assert_eq!(
        t.app.operation(OperationKey::AwaitOrder).error.as_deref(),
        Some("The order failed and will not be completed")
    );
    assert_eq!(t.app.last_order(), None);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_counts_as_pending() {
    let t = TestApp::new();
    t.api
        .fetch_order
        .push(Err(ApiError::http(404)))
        .push(Ok(pending_order("order-1")));

    orders::track_order(&t.app, &order_id()).await.unwrap();
    assert_eq!(t.api.fetch_order.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_fails_poll() {
    let t = TestApp::new();
    t.api.fetch_order.push(Err(ApiError::http(503)));

    let err = orders::track_order(&t.app, &order_id()).await.unwrap_err();
    assert_matches!(err, AppError::Transport { status: 503, .. });
    assert_eq!(t.api.fetch_order.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_sleep_skips_next_probe() {
    let t = TestApp::new();
    t.api.fetch_order.always(Ok(processing_order("order-1")));

    let started = Instant::now();
    let id = order_id();
    let (result, ()) = tokio::join!(orders::track_order(&t.app, &id), async {
        // Probes ran at t=0 and t=2000; the poll is asleep until t=4000
        sleep(Duration::from_millis(3_000)).await;
        assert!(orders::cancel_pending(&t.app));
    });

    assert_eq!(result.unwrap_err(), AppError::PollCancelled);
    assert_eq!(t.api.fetch_order.call_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(3_000));

    // Cancellation is silent
    assert!(t.app.toast().is_none());
    assert_eq!(t.app.operation(OperationKey::AwaitOrder).error, None);
    assert!(!t.app.operation(OperationKey::AwaitOrder).loading);
    assert!(!t.app.has_active_poll());
}

#[tokio::test(start_paused = true)]
async fn test_explicit_token_cancels_await() {
    let t = TestApp::new();
    t.api.fetch_order.always(Ok(processing_order("order-1")));
    let cancel = CancelToken::new();
    let policy = PollPolicy::new(15, 2_000).unwrap();

    let id = order_id();
    let (result, ()) = tokio::join!(
        orders::await_materialization(&t.app, &id, policy, &cancel),
        async {
            sleep(Duration::from_millis(500)).await;
            cancel.cancel();
        }
    );

    assert_eq!(result.unwrap_err(), AppError::PollCancelled);
    assert_eq!(t.api.fetch_order.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_poll_cancels_previous() {
    let config = AppConfig {
        poll_max_attempts: 3,
        ..AppConfig::default()
    };
    let t = TestApp::with_config(config);
    t.api.fetch_order.always(Ok(processing_order("order-1")));

    let id = order_id();
    let (first, second) = tokio::join!(orders::track_order(&t.app, &id), async {
        sleep(Duration::from_millis(1_000)).await;
        orders::track_order(&t.app, &OrderId::new("order-2")).await
    });

    assert_eq!(first.unwrap_err(), AppError::PollCancelled);
    assert_eq!(second.unwrap_err(), AppError::PollExhausted { attempts: 3 });
    // One probe for the first poll, three for the second
    assert_eq!(t.api.fetch_order.call_count(), 4);
    assert_eq!(
        t.app.operation(OperationKey::AwaitOrder).error.as_deref(),
        Some("Still processing, please check again shortly")
    );
}

#[tokio::test(start_paused = true)]
async fn test_superseded_poll_failure_stays_silent() {
    let t = TestApp::new();

    let id = order_id();
    let (first, second, ()) = tokio::join!(
        orders::track_order(&t.app, &id),
        async {
            t.api.fetch_order.wait_for_calls(1).await;
            orders::track_order(&t.app, &OrderId::new("order-2")).await
        },
        async {
            // order-1's probe was already in flight when order-2 replaced it
            t.api.fetch_order.wait_for_calls(2).await;
            assert!(t.api.fetch_order.respond(0, Ok(failed_order("order-1"))));
            tokio::task::yield_now().await;

            assert!(t.app.toast().is_none());
            let status = t.app.operation(OperationKey::AwaitOrder);
            assert!(status.loading);
            assert_eq!(status.error, None);

            assert!(t.api.fetch_order.respond(1, Ok(pending_order("order-2"))));
        }
    );

    assert_eq!(first.unwrap_err(), AppError::PollCancelled);
    assert_eq!(second.unwrap().id, OrderId::new("order-2"));
    assert_eq!(t.app.operation(OperationKey::AwaitOrder).error, None);
    assert_eq!(
        t.app.last_order().map(|order| order.id),
        Some(OrderId::new("order-2"))
    );
    assert_eq!(t.app.toast().map(|toast| toast.theme), Some(ToastTheme::Success));
}

#[tokio::test(start_paused = true)]
async fn test_submit_order_then_poll() {
    let t = TestApp::new();
    t.api.create_order.push(Ok(ticket("order-7")));
    t.api
        .fetch_order
        .push(Ok(processing_order("order-7")))
        .always(Ok(pending_order("order-7")));

    let order = orders::submit_order(&t.app, request()).await.unwrap();

    assert_eq!(order.id, OrderId::new("order-7"));
    assert_eq!(t.api.create_order.calls(), vec![request()]);
    assert_eq!(t.api.fetch_order.calls()[0], OrderId::new("order-7"));
    assert_eq!(t.app.last_order(), Some(order));
    assert_eq!(t.app.toast().map(|toast| toast.theme), Some(ToastTheme::Success));
    assert!(!t.app.operation(OperationKey::CreateOrder).loading);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_submission_never_polls() {
    let t = TestApp::new();
    t.api
        .create_order
        .push(Err(ApiError::business(10_001, "amount too small")));

    let err = orders::submit_order(&t.app, request()).await.unwrap_err();

    assert_matches!(err, AppError::Business { code: 10_001, .. });
    assert_eq!(t.api.fetch_order.call_count(), 0);
    assert_eq!(
        t.app.operation(OperationKey::CreateOrder).error.as_deref(),
        Some("The request could not be completed, please try again")
    );
}
