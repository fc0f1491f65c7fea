//! Purse Testing Infrastructure
//!
//! Scripted collaborators and fixtures for driving `AppCore` through exact
//! interleavings: a [`ScriptedWalletApi`] parks every call until the test
//! answers it, so responses can be delivered in any order.
//!
//! # Usage
//!
//! ```rust,ignore
//! let t = TestApp::new();
//! let (outcome, ()) = tokio::join!(bills::reload(&t.app, BillFilter::default()), async {
//!     t.api.bills.wait_for_calls(1).await;
//!     t.api.bills.respond(0, Ok(bill_page(&["a"], 1, false)));
//! });
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod api;
pub mod fixtures;
pub mod script;

pub use api::ScriptedWalletApi;
pub use fixtures::*;
pub use script::{Reply, Script};

use std::sync::Arc;

use purse_app::{AppConfig, AppCore};

/// An `AppCore` wired to a [`ScriptedWalletApi`] and the tokio clock.
///
/// Pair with `#[tokio::test(start_paused = true)]` for deterministic timing.
pub struct TestApp {
    /// The coordinator under test
    pub app: AppCore,
    /// Its scripted collaborator
    pub api: Arc<ScriptedWalletApi>,
}

impl TestApp {
    /// Default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Explicit configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let api = Arc::new(ScriptedWalletApi::new());
        let app = AppCore::with_tokio(config, api.clone()).expect("valid test config");
        Self { app, api }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
