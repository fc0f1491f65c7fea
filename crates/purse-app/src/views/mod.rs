//! # View State
//!
//! Plain state types that frontends render. Workflows mutate them through
//! [`AppCore`](crate::AppCore); frontends read snapshots or subscribe to the
//! corresponding signals.

pub mod network;
pub mod operations;
pub mod paged;

pub use network::NetworkState;
pub use operations::{OperationFlags, OperationGuard, OperationKey, OperationStatus};
pub use paged::PagedList;
