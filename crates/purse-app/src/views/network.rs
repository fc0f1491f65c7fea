//! Network selection state.

use serde::{Deserialize, Serialize};

use crate::bridge::{NetworkInfo, ReceiveOption, TransferOption};

/// The selected network and the option lists that depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    /// Network chosen by the user; applied before any dependent load
    pub selected: Option<NetworkInfo>,
    /// Assets receivable on the selected network
    pub receive_options: Vec<ReceiveOption>,
    /// Assets sendable on the selected network
    pub transfer_options: Vec<TransferOption>,
}

impl NetworkState {
    /// Switch to `network`, discarding options loaded for the previous one.
    pub fn select(&mut self, network: NetworkInfo) {
        self.selected = Some(network);
        self.receive_options.clear();
        self.transfer_options.clear();
    }
}
