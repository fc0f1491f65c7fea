//! # WalletApi: The HTTP Collaborator
//!
//! `purse-app` never talks to the network itself. The HTTP layer (request
//! executor, auth headers, token refresh, JSON decoding) implements
//! [`WalletApi`] and is injected into [`AppCore`](crate::AppCore).
//!
//! ```text
//! purse-app (pure)            http layer (runtime)
//! ┌──────────────────┐        ┌──────────────────┐
//! │ AppCore          │        │ HttpWalletApi    │
//! │   ┌───────────┐  │        │   implements     │
//! │   │ WalletApi │◄─┼────────│   WalletApi      │
//! │   └───────────┘  │        │                  │
//! └──────────────────┘        └──────────────────┘
//! ```
//!
//! Every method is a plain request/response call. Retries, backoff and
//! authentication refresh are the implementor's concern; the core only adds
//! the higher-level "poll until the server-side resource resolves" loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Transport Errors
// =============================================================================

/// Failure reported by the HTTP layer.
///
/// `http_status == 0` means no response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code, or 0 if the request never completed
    pub http_status: u16,
    /// Application-level error code from the response body
    pub server_code: Option<i64>,
    /// Application-level error message from the response body
    pub server_message: Option<String>,
}

impl ApiError {
    /// The request never produced a response (DNS, timeout, reset).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            http_status: 0,
            server_code: None,
            server_message: Some(message.into()),
        }
    }

    /// A bare HTTP failure with no application payload.
    pub fn http(status: u16) -> Self {
        Self {
            http_status: status,
            server_code: None,
            server_message: None,
        }
    }

    /// An application-level rejection with a server error code.
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self {
            http_status: 200,
            server_code: Some(code),
            server_message: Some(message.into()),
        }
    }

    /// Whether the credentials were rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.http_status == 401
    }

    /// Whether the server reported the resource does not exist (yet).
    pub fn is_not_found(&self) -> bool {
        self.http_status == 404
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.http_status == 0 {
            write!(f, "no response")?;
        } else {
            write!(f, "HTTP {}", self.http_status)?;
        }
        if let Some(code) = self.server_code {
            write!(f, " [{code}]")?;
        }
        if let Some(message) = &self.server_message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Paging
// =============================================================================

/// Page request sent to list endpoints. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub size: u32,
}

/// One page of a server-side list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Whether the server has further pages
    pub has_more: bool,
}

// =============================================================================
// Wallet Models
// =============================================================================

/// Chain/network identifier (e.g. `"TRON"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetworkId(pub String);

impl NetworkId {
    /// Create a network id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static description of a selectable network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Network identifier
    pub id: NetworkId,
    /// Human-readable name
    pub display_name: String,
    /// Native asset symbol
    pub native_asset: String,
}

/// Bill category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillKind {
    /// Incoming funds
    Receive,
    /// Outgoing funds
    Transfer,
    /// Asset swap
    Exchange,
}

/// Filter applied to the bill list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillFilter {
    /// Restrict to one category
    pub kind: Option<BillKind>,
    /// Restrict to one network
    pub network: Option<NetworkId>,
}

/// One entry of the transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Server identifier
    pub id: String,
    /// Category
    pub kind: BillKind,
    /// Amount in minor units
    pub amount_minor: i64,
    /// Asset symbol
    pub asset: String,
    /// Creation time (ms since epoch)
    pub created_at_ms: u64,
}

/// One inbox message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server identifier
    pub id: String,
    /// Headline
    pub title: String,
    /// Whether the user has opened it
    pub read: bool,
}

/// An asset that can be received on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveOption {
    /// Network the option belongs to
    pub network: NetworkId,
    /// Asset symbol
    pub asset: String,
    /// Minimum deposit in minor units
    pub min_amount_minor: i64,
}

/// An asset that can be sent on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOption {
    /// Network the option belongs to
    pub network: NetworkId,
    /// Asset symbol
    pub asset: String,
    /// Network fee in minor units
    pub fee_minor: i64,
}

/// A deposit address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveAddress {
    /// Network the address lives on
    pub network: NetworkId,
    /// Encoded address
    pub address: String,
}

/// Server-side order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Create an order id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order submission parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Network to settle on
    pub network: NetworkId,
    /// Asset symbol
    pub asset: String,
    /// Amount in minor units
    pub amount_minor: i64,
}

/// Acknowledgement of an accepted order. The order itself is materialized
/// asynchronously on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTicket {
    /// Identifier to poll
    pub order_id: OrderId,
}

/// Server-side order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier
    pub id: OrderId,
    /// Raw status code; see [`OrderStatus::from_code`]
    pub status: i32,
    /// Amount in minor units
    pub amount_minor: i64,
    /// Server-provided reason when `status` is failed
    pub failure_reason: Option<String>,
}

impl Order {
    /// Interpreted status.
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_code(self.status)
    }
}

/// Materialization state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order record exists and awaits settlement
    Pending,
    /// The server gave up on the order
    Failed,
    /// The order record is still being produced
    Processing,
}

impl OrderStatus {
    /// Status code for [`OrderStatus::Pending`].
    pub const PENDING_CODE: i32 = 1;
    /// Status code for [`OrderStatus::Failed`].
    pub const FAILED_CODE: i32 = 2;

    /// Interpret a raw status code. Unknown codes mean still processing.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::PENDING_CODE => Self::Pending,
            Self::FAILED_CODE => Self::Failed,
            _ => Self::Processing,
        }
    }
}

// =============================================================================
// The Trait
// =============================================================================

/// Async contract consumed from the HTTP layer.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// One page of the bill list.
    async fn fetch_bills(
        &self,
        filter: &BillFilter,
        request: PageRequest,
    ) -> Result<Page<Bill>, ApiError>;

    /// One page of the message inbox.
    async fn fetch_messages(&self, request: PageRequest) -> Result<Page<Message>, ApiError>;

    /// Assets receivable on `network`.
    async fn fetch_receive_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<ReceiveOption>, ApiError>;

    /// Assets sendable on `network`.
    async fn fetch_transfer_options(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<TransferOption>, ApiError>;

    /// Submit an order; the returned ticket is polled via [`fetch_order`](Self::fetch_order).
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderTicket, ApiError>;

    /// Current server-side state of an order.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, ApiError>;

    /// Allocate a new deposit address on `network`.
    async fn create_receive_address(&self, network: &NetworkId)
        -> Result<ReceiveAddress, ApiError>;
}

/// Shared trait object for the collaborator.
pub type BoxedWalletApi = std::sync::Arc<dyn WalletApi>;
