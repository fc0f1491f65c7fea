//! # Purse App - Portable Headless Application Core
//!
//! `purse-app` owns the wallet client's request coordination: every user
//! action that reaches the server goes through a workflow that decides
//! whether its response may still touch UI-bound state.
//!
//! ## Architecture
//!
//! ```text
//! frontend ──► workflows::* ──► AppCore ──► WalletApi (injected)
//!                  │               │
//!                  │               ├─ GenerationCounter<StreamId>
//!                  │               ├─ SingleFlightGate per list
//!                  │               ├─ EphemeralNotifier
//!                  │               └─ OperationFlags
//!                  ▼
//!            Mutable view state ──► signals ──► frontend
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = AppCore::with_tokio(AppConfig::default(), api)?;
//! workflows::bills::reload(&app, BillFilter::default()).await?;
//! let bills = app.bills();
//! ```

#![forbid(unsafe_code)]

/// External HTTP collaborator contract and wallet models
pub mod bridge;

/// Application configuration
pub mod config;

/// State holder and stream identities
pub mod core;

/// Categorized application errors
pub mod errors;

/// Observable view state
pub mod views;

/// Portable multi-step operations
pub mod workflows;

#[cfg(feature = "demo")]
pub mod demo;

pub use crate::bridge::{
    ApiError, Bill, BillFilter, BillKind, BoxedWalletApi, Message, NetworkId, NetworkInfo, Order,
    OrderId, OrderRequest, OrderStatus, OrderTicket, Page, PageRequest, ReceiveAddress,
    ReceiveOption, TransferOption, WalletApi,
};
pub use crate::config::AppConfig;
pub use crate::core::{AppCore, ListStream, StreamId};
pub use crate::errors::{AppError, ErrorCategory, ADDRESS_LIMIT_REACHED};
pub use crate::views::{NetworkState, OperationKey, OperationStatus, PagedList};
pub use crate::workflows::{DropReason, LoadOutcome};

pub use purse_core::{CancelToken, PollPolicy, ToastEntry, ToastId, ToastTheme};
