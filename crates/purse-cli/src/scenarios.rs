//! Scripted user sessions.

use anyhow::Result;
use futures::future::join_all;
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

use purse_app::demo::DemoWalletApi;
use purse_app::workflows::{address, bills, network, orders};
use purse_app::{
    AppCore, BillFilter, BillKind, DropReason, LoadOutcome, NetworkId, OrderRequest, ToastTheme,
};

fn describe(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Applied => "applied",
        LoadOutcome::Dropped(DropReason::StaleResponse) => "dropped (superseded)",
        LoadOutcome::Dropped(DropReason::GateRejected) => "dropped (already loading)",
    }
}

/// Select every demo network 50 ms apart. Slower networks answer last, so
/// only the final selection may land.
pub async fn rapid_switch(app: &AppCore) -> Result<()> {
    let switches = DemoWalletApi::networks()
        .into_iter()
        .zip(0u64..)
        .map(|(info, index)| async move {
            sleep(Duration::from_millis(index * 50)).await;
            let id = info.id.clone();
            (id, network::select_network(app, info).await)
        });

    for (id, outcome) in join_all(switches).await {
        println!("{id:>6}: {}", describe(outcome?));
    }

    let state = app.network();
    let selected = state
        .selected
        .map(|info| info.display_name)
        .unwrap_or_default();
    println!("selected: {selected}");
    for option in &state.receive_options {
        println!("  receive  {} on {}", option.asset, option.network);
    }
    for option in &state.transfer_options {
        println!("  transfer {} on {}", option.asset, option.network);
    }
    Ok(())
}

/// Load page 1, trigger page 2 twice, then refresh while page 3 is loading.
pub async fn paginate(app: &AppCore) -> Result<()> {
    let reload = bills::reload(app, BillFilter::default()).await?;
    println!("reload:           {}", describe(reload));

    let (first, second) = tokio::join!(bills::load_more(app, 2), bills::load_more(app, 2));
    println!("page 2 trigger 1: {}", describe(first?));
    println!("page 2 trigger 2: {}", describe(second?));

    let transfers = BillFilter {
        kind: Some(BillKind::Transfer),
        network: None,
    };
    let (page_3, refresh) = tokio::join!(bills::load_more(app, 3), async {
        sleep(Duration::from_millis(50)).await;
        bills::reload(app, transfers).await
    });
    println!("page 3:           {}", describe(page_3?));
    println!("refresh:          {}", describe(refresh?));

    let list = app.bills();
    println!(
        "bills: {} item(s), page {}, more: {}",
        list.items.len(),
        list.page,
        list.has_more
    );
    Ok(())
}

/// Submit an order and wait for it, optionally cancelling midway.
pub async fn poll_order(app: &AppCore, amount: i64, cancel_after_ms: Option<u64>) -> Result<()> {
    let request = OrderRequest {
        network: NetworkId::new("TRON"),
        asset: "USDT".to_string(),
        amount_minor: amount,
    };

    let result = match cancel_after_ms {
        Some(ms) => {
            let (result, cancelled) = tokio::join!(orders::submit_order(app, request), async {
                sleep(Duration::from_millis(ms)).await;
                orders::cancel_pending(app)
            });
            if !cancelled {
                println!("nothing to cancel after {ms} ms");
            }
            result
        }
        None => orders::submit_order(app, request).await,
    };

    match result {
        Ok(order) => println!("order {} materialized (status {})", order.id, order.status),
        Err(err) if err.is_silent() => println!("order poll cancelled"),
        Err(err) => println!("order not completed: {} [{}]", err.user_message(), err.code()),
    }
    Ok(())
}

/// Create deposit addresses until the per-network limit is hit.
pub async fn addresses(app: &AppCore, network: &str) -> Result<()> {
    let network = NetworkId::new(network);
    for attempt in 1..=DemoWalletApi::ADDRESS_LIMIT + 1 {
        match address::create_receive_address(app, &network).await {
            Ok(created) => println!("#{attempt}: {}", created.address),
            Err(err) => println!("#{attempt}: {}", err.user_message()),
        }
    }
    Ok(())
}

/// Show A, supersede it with B 500 ms later, and sample the display.
pub async fn toasts(app: &AppCore) -> Result<()> {
    let start = Instant::now();
    app.notify("A", ToastTheme::Info);
    sleep(Duration::from_millis(500)).await;
    app.notify("B", ToastTheme::Info);

    let duration = app.config().toast_duration_ms;
    for at in [duration.saturating_sub(100), duration + 100, duration + 600] {
        sleep_until(start + Duration::from_millis(at)).await;
        let shown = app
            .toast()
            .map(|toast| toast.message)
            .unwrap_or_else(|| "-".to_string());
        println!("t={at:>5}ms  {shown}");
    }
    Ok(())
}

/// Final view state as pretty JSON.
pub fn snapshot(app: &AppCore) -> Result<String> {
    let toast = app.toast().map(|toast| {
        json!({
            "message": toast.message,
            "theme": toast.theme,
        })
    });
    let state = json!({
        "bills": app.bills(),
        "bill_filter": app.bill_filter(),
        "messages": app.messages(),
        "network": app.network(),
        "last_order": app.last_order(),
        "last_address": app.last_address(),
        "operations": app.operations().snapshot(),
        "toast": toast,
    });
    Ok(serde_json::to_string_pretty(&state)?)
}
