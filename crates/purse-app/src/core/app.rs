//! # AppCore
//!
//! The single state holder shared by every workflow. It is an explicit
//! context object: frontends construct one, wrap it in an `Arc` if they need
//! to share it between tasks, and pass `&AppCore` to workflow functions.
//!
//! All fields use interior mutability, and every mutation of list or
//! selection state goes through the stream's generation counter so the
//! staleness check and the write happen atomically.

use futures_signals::signal::{Mutable, Signal};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use purse_core::{
    CancelToken, EphemeralNotifier, Generation, GenerationCounter, SingleFlightGate, TaskSpawner,
    TimeEffects, ToastEntry, ToastId, ToastTheme,
};
use purse_effects::{TokioSpawner, TokioTimeHandler};

use crate::bridge::{Bill, BillFilter, BoxedWalletApi, Message, Order, ReceiveAddress, WalletApi};
use crate::config::AppConfig;
use crate::core::stream::{ListStream, StreamId};
use crate::errors::AppError;
use crate::views::{NetworkState, OperationFlags, OperationKey, OperationStatus, PagedList};

/// Observable view state. Written only by workflows.
#[derive(Debug, Default)]
pub(crate) struct ViewState {
    pub(crate) bills: Mutable<PagedList<Bill>>,
    pub(crate) bill_filter: Mutable<BillFilter>,
    pub(crate) messages: Mutable<PagedList<Message>>,
    pub(crate) network: Mutable<NetworkState>,
    pub(crate) last_order: Mutable<Option<Order>>,
    pub(crate) last_address: Mutable<Option<ReceiveAddress>>,
}

/// Application state holder and request coordinator.
pub struct AppCore {
    config: AppConfig,
    api: BoxedWalletApi,
    time: Arc<dyn TimeEffects>,
    generations: GenerationCounter<StreamId>,
    bill_gate: SingleFlightGate,
    message_gate: SingleFlightGate,
    notifier: EphemeralNotifier,
    flags: OperationFlags,
    views: ViewState,
    /// Cancellation handle of the one poll allowed to run
    active_poll: Mutex<Option<CancelToken>>,
}

impl AppCore {
    /// Create a coordinator over explicit effect handlers.
    pub fn new(
        config: AppConfig,
        api: BoxedWalletApi,
        time: Arc<dyn TimeEffects>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let notifier = EphemeralNotifier::new(Arc::clone(&time), spawner);
        Ok(Self {
            config,
            api,
            time,
            generations: GenerationCounter::new(),
            bill_gate: SingleFlightGate::new(),
            message_gate: SingleFlightGate::new(),
            notifier,
            flags: OperationFlags::new(),
            views: ViewState::default(),
            active_poll: Mutex::new(None),
        })
    }

    /// Create a coordinator driven by the tokio runtime.
    pub fn with_tokio(config: AppConfig, api: BoxedWalletApi) -> Result<Self, AppError> {
        Self::new(
            config,
            api,
            Arc::new(TokioTimeHandler::new()),
            Arc::new(TokioSpawner),
        )
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    /// Active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Snapshot of the bill list.
    pub fn bills(&self) -> PagedList<Bill> {
        self.views.bills.get_cloned()
    }

    /// Bill list signal.
    pub fn bills_signal(&self) -> impl Signal<Item = PagedList<Bill>> {
        self.views.bills.signal_cloned()
    }

    /// Filter of the most recent bill reload.
    pub fn bill_filter(&self) -> BillFilter {
        self.views.bill_filter.get_cloned()
    }

    /// Snapshot of the message inbox.
    pub fn messages(&self) -> PagedList<Message> {
        self.views.messages.get_cloned()
    }

    /// Message inbox signal.
    pub fn messages_signal(&self) -> impl Signal<Item = PagedList<Message>> {
        self.views.messages.signal_cloned()
    }

    /// Snapshot of the network selection.
    pub fn network(&self) -> NetworkState {
        self.views.network.get_cloned()
    }

    /// Network selection signal.
    pub fn network_signal(&self) -> impl Signal<Item = NetworkState> {
        self.views.network.signal_cloned()
    }

    /// Most recently materialized order.
    pub fn last_order(&self) -> Option<Order> {
        self.views.last_order.get_cloned()
    }

    /// Most recently allocated deposit address.
    pub fn last_address(&self) -> Option<ReceiveAddress> {
        self.views.last_address.get_cloned()
    }

    /// Displayed toast, if any.
    pub fn toast(&self) -> Option<ToastEntry> {
        self.notifier.current()
    }

    /// Toast signal.
    pub fn toast_signal(&self) -> impl Signal<Item = Option<ToastEntry>> {
        self.notifier.signal()
    }

    /// Loading/error state of one operation.
    pub fn operation(&self, key: OperationKey) -> OperationStatus {
        self.flags.get(key)
    }

    /// Loading/error flags of every operation.
    pub fn operations(&self) -> &OperationFlags {
        &self.flags
    }

    /// Whether `generation` still names the live request on its stream.
    pub fn is_current(&self, generation: &Generation<StreamId>) -> bool {
        self.generations.is_current(generation)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Show a toast for the configured duration.
    pub fn notify(&self, message: impl Into<String>, theme: ToastTheme) -> ToastId {
        self.notifier.notify(message, theme, self.config.toast_duration_ms)
    }

    /// Show a toast for `duration_ms`.
    pub fn notify_for(
        &self,
        message: impl Into<String>,
        theme: ToastTheme,
        duration_ms: u64,
    ) -> ToastId {
        self.notifier.notify(message, theme, duration_ms)
    }

    /// Dismiss a toast early if it is still displayed.
    pub fn dismiss_toast(&self, id: ToastId) -> bool {
        self.notifier.dismiss(id)
    }

    /// Surface a failed operation: log the technical error, record the
    /// user-facing message on `key` and show it as a toast.
    ///
    /// Silent errors (cancellation) are logged at debug and go no further.
    pub fn report(&self, key: OperationKey, err: &AppError) {
        if err.is_silent() {
            tracing::debug!(%key, code = err.code(), "operation abandoned");
            return;
        }

        tracing::warn!(
            %key,
            code = err.code(),
            category = %err.category(),
            error = %err,
            "operation failed"
        );
        let message = err.user_message();
        self.flags.fail(key, message);
        self.notify(message, err.toast_theme());
    }

    // =========================================================================
    // Workflow Plumbing
    // =========================================================================

    pub(crate) fn api(&self) -> &dyn WalletApi {
        self.api.as_ref()
    }

    pub(crate) fn time(&self) -> &dyn TimeEffects {
        self.time.as_ref()
    }

    pub(crate) fn generations(&self) -> &GenerationCounter<StreamId> {
        &self.generations
    }

    pub(crate) fn gate(&self, list: ListStream) -> &SingleFlightGate {
        match list {
            ListStream::Bills => &self.bill_gate,
            ListStream::Messages => &self.message_gate,
        }
    }

    pub(crate) fn views(&self) -> &ViewState {
        &self.views
    }

    /// Install a fresh poll token, cancelling the poll it replaces.
    pub(crate) fn install_poll(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Some(previous) = self.active_poll.lock().replace(token.clone()) {
            tracing::debug!("cancelling superseded poll");
            previous.cancel();
        }
        token
    }

    /// Forget `token` if it is still the active poll.
    pub(crate) fn release_poll(&self, token: &CancelToken) {
        let mut active = self.active_poll.lock();
        if active.as_ref().is_some_and(|current| current.same_as(token)) {
            *active = None;
        }
    }

    /// Cancel the active poll. Returns `false` if none was running.
    pub fn cancel_active_poll(&self) -> bool {
        match self.active_poll.lock().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a poll is running.
    pub fn has_active_poll(&self) -> bool {
        self.active_poll.lock().is_some()
    }
}

impl fmt::Debug for AppCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCore")
            .field("config", &self.config)
            .field("flags", &self.flags)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
