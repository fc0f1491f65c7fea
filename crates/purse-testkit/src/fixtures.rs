//! Wallet model fixtures.

use purse_app::{
    Bill, BillKind, Message, NetworkId, NetworkInfo, Order, OrderId, OrderStatus, OrderTicket,
    Page, ReceiveAddress, ReceiveOption, TransferOption,
};

/// A receive bill with id `id`.
pub fn bill(id: &str) -> Bill {
    Bill {
        id: id.to_string(),
        kind: BillKind::Receive,
        amount_minor: 100,
        asset: "USDT".to_string(),
        created_at_ms: 0,
    }
}

/// Page `page` holding one bill per id.
pub fn bill_page(ids: &[&str], page: u32, has_more: bool) -> Page<Bill> {
    Page {
        items: ids.iter().map(|id| bill(id)).collect(),
        page,
        has_more,
    }
}

/// An unread message with id `id`.
pub fn message(id: &str) -> Message {
    Message {
        id: id.to_string(),
        title: format!("Message {id}"),
        read: false,
    }
}

/// Page `page` holding one message per id.
pub fn message_page(ids: &[&str], page: u32, has_more: bool) -> Page<Message> {
    Page {
        items: ids.iter().map(|id| message(id)).collect(),
        page,
        has_more,
    }
}

/// Network `id` with matching display name and asset.
pub fn network(id: &str) -> NetworkInfo {
    NetworkInfo {
        id: NetworkId::new(id),
        display_name: id.to_string(),
        native_asset: id.to_string(),
    }
}

/// One receive option for `network`.
pub fn receive_options(network: &str) -> Vec<ReceiveOption> {
    vec![ReceiveOption {
        network: NetworkId::new(network),
        asset: "USDT".to_string(),
        min_amount_minor: 100,
    }]
}

/// One transfer option for `network`.
pub fn transfer_options(network: &str) -> Vec<TransferOption> {
    vec![TransferOption {
        network: NetworkId::new(network),
        asset: "USDT".to_string(),
        fee_minor: 10,
    }]
}

/// Ticket for order `id`.
pub fn ticket(id: &str) -> OrderTicket {
    OrderTicket {
        order_id: OrderId::new(id),
    }
}

/// Order `id` with raw status code `status`.
pub fn order(id: &str, status: i32) -> Order {
    Order {
        id: OrderId::new(id),
        status,
        amount_minor: 1_000,
        failure_reason: (status == OrderStatus::FAILED_CODE).then(|| "rejected".to_string()),
    }
}

/// Order `id` still being produced.
pub fn processing_order(id: &str) -> Order {
    order(id, 0)
}

/// Order `id` that exists and awaits settlement.
pub fn pending_order(id: &str) -> Order {
    order(id, OrderStatus::PENDING_CODE)
}

/// Order `id` the server gave up on.
pub fn failed_order(id: &str) -> Order {
    order(id, OrderStatus::FAILED_CODE)
}

/// Deposit address on `network`.
pub fn address(network: &str, address: &str) -> ReceiveAddress {
    ReceiveAddress {
        network: NetworkId::new(network),
        address: address.to_string(),
    }
}
