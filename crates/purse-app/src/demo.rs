//! In-memory [`WalletApi`] with simulated latency.
//!
//! Used by the `purse` CLI scenarios. Latency is per network so rapid
//! switching produces out-of-order completions:
//!
//! | network | latency |
//! |---------|---------|
//! | `TRON`  | 3x base |
//! | `ETH`   | 2x base |
//! | other   | 1x base |
//!
//! Orders resolve after [`DemoWalletApi::ORDER_READY_AFTER`] probes; orders
//! for a non-positive amount fail. Each network allows
//! [`DemoWalletApi::ADDRESS_LIMIT`] addresses.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use purse_core::TimeEffects;

use crate::bridge::{
    ApiError, Bill, BillFilter, BillKind, Message, NetworkId, NetworkInfo, Order, OrderId,
    OrderRequest, OrderStatus, OrderTicket, Page, PageRequest, ReceiveAddress, ReceiveOption,
    TransferOption, WalletApi,
};
use crate::errors::ADDRESS_LIMIT_REACHED;

#[derive(Debug, Default)]
struct DemoState {
    next_order: u64,
    /// Order amount and remaining probes before it resolves
    orders: HashMap<OrderId, (i64, u32)>,
    addresses: HashMap<NetworkId, u32>,
}

/// Deterministic wallet backend for demos.
pub struct DemoWalletApi {
    time: Arc<dyn TimeEffects>,
    base_latency_ms: u64,
    total_pages: u32,
    state: Mutex<DemoState>,
}

impl DemoWalletApi {
    /// Probes an order needs before it resolves.
    pub const ORDER_READY_AFTER: u32 = 3;
    /// Addresses allowed per network.
    pub const ADDRESS_LIMIT: u32 = 2;

    /// Create a backend with `base_latency_ms` per call.
    pub fn new(time: Arc<dyn TimeEffects>, base_latency_ms: u64) -> Self {
        Self {
            time,
            base_latency_ms,
            total_pages: 3,
            state: Mutex::new(DemoState::default()),
        }
    }

    /// Networks the demo knows about.
    pub fn networks() -> Vec<NetworkInfo> {
        [("TRON", "Tron", "TRX"), ("ETH", "Ethereum", "ETH"), ("BSC", "BNB Chain", "BNB")]
            .into_iter()
            .map(|(id, name, asset)| NetworkInfo {
                id: NetworkId::new(id),
                display_name: name.to_string(),
                native_asset: asset.to_string(),
            })
            .collect()
    }

    fn latency_for(&self, network: &NetworkId) -> u64 {
        match network.0.as_str() {
            "TRON" => self.base_latency_ms * 3,
            "ETH" => self.base_latency_ms * 2,
            _ => self.base_latency_ms,
        }
    }

    fn page<T>(&self, request: PageRequest, make: impl Fn(u32) -> T) -> Page<T> {
        if request.page == 0 || request.page > self.total_pages {
            return Page {
                items: Vec::new(),
                page: request.page,
                has_more: false,
            };
        }
        let start = (request.page - 1).saturating_mul(request.size);
        Page {
            items: (start..start.saturating_add(request.size)).map(make).collect(),
            page: request.page,
            has_more: request.page < self.total_pages,
        }
    }
}

#[async_trait]
impl WalletApi for DemoWalletApi {
    async fn fetch_bills(
        &self,
        filter: &BillFilter,
        request: PageRequest,
    ) -> Result<Page<Bill>, ApiError> {
        self.time.sleep_ms(self.base_latency_ms).await;
        let kind = filter.kind.unwrap_or(BillKind::Receive);
        let now = self.time.now_ms();
        Ok(self.page(request, |n| Bill {
            id: format!("bill-{n}"),
            kind,
            amount_minor: i64::from(n + 1) * 100,
            asset: "USDT".to_string(),
            created_at_ms: now,
        }))
    }

    async fn fetch_messages(&self, request: PageRequest) -> Result<Page<Message>, ApiError> {
        self.time.sleep_ms(self.base_latency_ms).await;
        Ok(self.page(request, |n| Message {
            id: format!("msg-{n}"),
            title: format!("Notice #{n}"),
            read: n % 2 == 0,
        }))
    }

    async fn fetch_receive_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<ReceiveOption>, ApiError> {
        self.time.sleep_ms(self.latency_for(network)).await;
        Ok(vec![ReceiveOption {
            network: network.clone(),
            asset: "USDT".to_string(),
            min_amount_minor: 100,
        }])
    }

    async fn fetch_transfer_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<TransferOption>, ApiError> {
        self.time.sleep_ms(self.latency_for(network)).await;
        Ok(vec![TransferOption {
            network: network.clone(),
            asset: "USDT".to_string(),
            fee_minor: 25,
        }])
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<OrderTicket, ApiError> {
        self.time.sleep_ms(self.base_latency_ms).await;
        let mut state = self.state.lock();
        state.next_order += 1;
        let order_id = OrderId::new(format!("order-{}", state.next_order));
        state
            .orders
            .insert(order_id.clone(), (request.amount_minor, Self::ORDER_READY_AFTER));
        Ok(OrderTicket { order_id })
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        self.time.sleep_ms(self.base_latency_ms).await;
        let mut state = self.state.lock();
        let Some((amount_minor, remaining)) = state.orders.get_mut(order_id) else {
            return Err(ApiError::http(404));
        };

        *remaining = remaining.saturating_sub(1);
        let (status, failure_reason) = if *amount_minor <= 0 {
            (OrderStatus::FAILED_CODE, Some("amount must be positive".to_string()))
        } else if *remaining == 0 {
            (OrderStatus::PENDING_CODE, None)
        } else {
            (0, None)
        };
        Ok(Order {
            id: order_id.clone(),
            status,
            amount_minor: *amount_minor,
            failure_reason,
        })
    }

    async fn create_receive_address(
        &self,
        network: &NetworkId,
    ) -> Result<ReceiveAddress, ApiError> {
        self.time.sleep_ms(self.base_latency_ms).await;
        let mut state = self.state.lock();
        let count = state.addresses.entry(network.clone()).or_insert(0);
        if *count >= Self::ADDRESS_LIMIT {
            return Err(ApiError::business(
                ADDRESS_LIMIT_REACHED,
                "address limit reached",
            ));
        }
        *count += 1;
        Ok(ReceiveAddress {
            network: network.clone(),
            address: format!("{}-addr-{count}", network.0.to_lowercase()),
        })
    }
}
