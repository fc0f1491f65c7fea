//! Network selection cascade.

use purse_app::workflows::network::select_network;
use purse_app::{ApiError, DropReason, LoadOutcome, NetworkId, OperationKey};
use purse_testkit::{network, receive_options, transfer_options, TestApp};

fn selected(t: &TestApp) -> Option<String> {
    t.app.network().selected.map(|info| info.id.0)
}

#[tokio::test]
async fn test_selection_applies_before_any_load() {
    let t = TestApp::new();
    t.api.receive_options.push(Ok(receive_options("TRON")));
    t.api.transfer_options.push(Ok(transfer_options("TRON")));
    select_network(&t.app, network("TRON")).await.unwrap();

    let (outcome, ()) = tokio::join!(select_network(&t.app, network("ETH")), async {
        t.api.receive_options.wait_for_calls(2).await;
        // Choice visible immediately, stale options cleared
        assert_eq!(selected(&t).as_deref(), Some("ETH"));
        assert!(t.app.network().receive_options.is_empty());
        assert!(t.app.network().transfer_options.is_empty());
        assert!(t.app.operation(OperationKey::ReceiveOptions).loading);

        assert!(t.api.receive_options.respond_next(Ok(receive_options("ETH"))));
        t.api.transfer_options.wait_for_calls(2).await;
        assert!(t.api.transfer_options.respond_next(Ok(transfer_options("ETH"))));
    });

    assert_eq!(outcome.unwrap(), LoadOutcome::Applied);
    let state = t.app.network();
    assert_eq!(state.receive_options[0].network, NetworkId::new("ETH"));
    assert_eq!(state.transfer_options[0].network, NetworkId::new("ETH"));
}

#[tokio::test]
async fn test_switch_during_primary_load_drops_old_sequence() {
    let t = TestApp::new();

    let (tron, eth, ()) = tokio::join!(
        select_network(&t.app, network("TRON")),
        async {
            t.api.receive_options.wait_for_calls(1).await;
            select_network(&t.app, network("ETH")).await
        },
        async {
            t.api.receive_options.wait_for_calls(2).await;
            assert!(t.api.receive_options.respond(1, Ok(receive_options("ETH"))));
            t.api.transfer_options.wait_for_calls(1).await;
            assert!(t.api.transfer_options.respond(0, Ok(transfer_options("ETH"))));
            tokio::task::yield_now().await;
            // TRON's primary load completes last
            assert!(t.api.receive_options.respond(0, Ok(receive_options("TRON"))));
        }
    );

    assert_eq!(tron.unwrap(), LoadOutcome::Dropped(DropReason::StaleResponse));
    assert_eq!(eth.unwrap(), LoadOutcome::Applied);
    assert_eq!(selected(&t).as_deref(), Some("ETH"));
    assert_eq!(
        t.app.network().receive_options[0].network,
        NetworkId::new("ETH")
    );
    // The superseded sequence never reached its secondary load
    assert_eq!(
        t.api.transfer_options.calls(),
        vec![NetworkId::new("ETH")]
    );
}

#[tokio::test]
async fn test_switch_during_secondary_load_drops_old_secondary() {
    let t = TestApp::new();

    let (tron, eth, ()) = tokio::join!(
        select_network(&t.app, network("TRON")),
        async {
            // TRON is past its primary load and waiting on transfer options
            t.api.transfer_options.wait_for_calls(1).await;
            select_network(&t.app, network("ETH")).await
        },
        async {
            t.api.receive_options.wait_for_calls(1).await;
            assert!(t.api.receive_options.respond(0, Ok(receive_options("TRON"))));

            t.api.receive_options.wait_for_calls(2).await;
            assert!(t.api.receive_options.respond(1, Ok(receive_options("ETH"))));
            t.api.transfer_options.wait_for_calls(2).await;
            assert!(t.api.transfer_options.respond(1, Ok(transfer_options("ETH"))));
            tokio::task::yield_now().await;
            assert!(t.api.transfer_options.respond(0, Ok(transfer_options("TRON"))));
        }
    );

    assert_eq!(tron.unwrap(), LoadOutcome::Dropped(DropReason::StaleResponse));
    assert_eq!(eth.unwrap(), LoadOutcome::Applied);
    let state = t.app.network();
    assert_eq!(state.receive_options[0].network, NetworkId::new("ETH"));
    assert_eq!(state.transfer_options[0].network, NetworkId::new("ETH"));
}

#[tokio::test]
async fn test_primary_failure_reports_and_stops() {
    let t = TestApp::new();
    t.api.receive_options.push(Err(ApiError::http(502)));

    let err = select_network(&t.app, network("TRON")).await.unwrap_err();
    assert_eq!(err.code(), "NET_TRANSPORT");
    assert_eq!(t.api.transfer_options.call_count(), 0);

    let status = t.app.operation(OperationKey::ReceiveOptions);
    assert!(!status.loading);
    assert_eq!(status.error.as_deref(), Some(err.user_message()));
    // The selection itself stands
    assert_eq!(selected(&t).as_deref(), Some("TRON"));
}

#[tokio::test]
async fn test_superseded_failure_is_silent() {
    let t = TestApp::new();

    let (tron, eth, ()) = tokio::join!(
        select_network(&t.app, network("TRON")),
        async {
            t.api.receive_options.wait_for_calls(1).await;
            select_network(&t.app, network("ETH")).await
        },
        async {
            t.api.receive_options.wait_for_calls(2).await;
            assert!(t.api.receive_options.respond(0, Err(ApiError::http(500))));
            assert!(t.api.receive_options.respond(1, Ok(receive_options("ETH"))));
            t.api.transfer_options.wait_for_calls(1).await;
            assert!(t.api.transfer_options.respond(0, Ok(transfer_options("ETH"))));
        }
    );

    assert_eq!(tron.unwrap(), LoadOutcome::Dropped(DropReason::StaleResponse));
    assert_eq!(eth.unwrap(), LoadOutcome::Applied);
    assert_eq!(t.app.operation(OperationKey::ReceiveOptions).error, None);
    assert!(t.app.toast().is_none());
}
