//! Stream identities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::views::OperationKey;

/// Independent request streams, each with its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamId {
    /// Transaction history
    Bills,
    /// Message inbox
    Messages,
    /// Active network and its dependent option lists
    NetworkSelection,
    /// Order submission and materialization
    Orders,
}

impl StreamId {
    /// Stable name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bills => "bills",
            Self::Messages => "messages",
            Self::NetworkSelection => "network_selection",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paginated streams. Each owns a generation stream and a gate namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListStream {
    /// Transaction history
    Bills,
    /// Message inbox
    Messages,
}

impl ListStream {
    /// Generation stream backing this list.
    pub fn stream(self) -> StreamId {
        match self {
            Self::Bills => StreamId::Bills,
            Self::Messages => StreamId::Messages,
        }
    }

    /// Prefix of this list's gate tokens (`"<prefix>.page.<n>"`).
    pub fn gate_prefix(self) -> &'static str {
        match self {
            Self::Bills => "bill",
            Self::Messages => "message",
        }
    }

    /// Operation key of a root load.
    pub fn reload_key(self) -> OperationKey {
        match self {
            Self::Bills => OperationKey::ReloadBills,
            Self::Messages => OperationKey::ReloadMessages,
        }
    }

    /// Operation key of a page advance.
    pub fn load_more_key(self) -> OperationKey {
        match self {
            Self::Bills => OperationKey::LoadMoreBills,
            Self::Messages => OperationKey::LoadMoreMessages,
        }
    }
}

impl fmt::Display for ListStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream().as_str())
    }
}
