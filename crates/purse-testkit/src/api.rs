//! Scripted `WalletApi`.

use async_trait::async_trait;

use purse_app::{
    ApiError, Bill, BillFilter, Message, NetworkId, Order, OrderId, OrderRequest, OrderTicket,
    Page, PageRequest, ReceiveAddress, ReceiveOption, TransferOption, WalletApi,
};

use crate::script::Script;

/// `WalletApi` whose every method is driven by a [`Script`].
pub struct ScriptedWalletApi {
    /// `fetch_bills` calls
    pub bills: Script<(BillFilter, PageRequest), Page<Bill>>,
    /// `fetch_messages` calls
    pub messages: Script<PageRequest, Page<Message>>,
    /// `fetch_receive_options` calls
    pub receive_options: Script<NetworkId, Vec<ReceiveOption>>,
    /// `fetch_transfer_options` calls
    pub transfer_options: Script<NetworkId, Vec<TransferOption>>,
    /// `create_order` calls
    pub create_order: Script<OrderRequest, OrderTicket>,
    /// `fetch_order` calls
    pub fetch_order: Script<OrderId, Order>,
    /// `create_receive_address` calls
    pub create_address: Script<NetworkId, ReceiveAddress>,
}

impl ScriptedWalletApi {
    /// Every method parks its calls until answered.
    pub fn new() -> Self {
        Self {
            bills: Script::new("fetch_bills"),
            messages: Script::new("fetch_messages"),
            receive_options: Script::new("fetch_receive_options"),
            transfer_options: Script::new("fetch_transfer_options"),
            create_order: Script::new("create_order"),
            fetch_order: Script::new("fetch_order"),
            create_address: Script::new("create_receive_address"),
        }
    }
}

impl Default for ScriptedWalletApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletApi for ScriptedWalletApi {
    async fn fetch_bills(
        &self,
        filter: &BillFilter,
        request: PageRequest,
    ) -> Result<Page<Bill>, ApiError> {
        self.bills.call((filter.clone(), request)).await
    }

    async fn fetch_messages(&self, request: PageRequest) -> Result<Page<Message>, ApiError> {
        self.messages.call(request).await
    }

    async fn fetch_receive_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<ReceiveOption>, ApiError> {
        self.receive_options.call(network.clone()).await
    }

    async fn fetch_transfer_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<TransferOption>, ApiError> {
        self.transfer_options.call(network.clone()).await
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<OrderTicket, ApiError> {
        self.create_order.call(request.clone()).await
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        self.fetch_order.call(order_id.clone()).await
    }

    async fn create_receive_address(
        &self,
        network: &NetworkId,
    ) -> Result<ReceiveAddress, ApiError> {
        self.create_address.call(network.clone()).await
    }
}
