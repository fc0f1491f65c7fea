//! Ephemeral toast notifications.
//!
//! A toast is fire-and-forget from the call site. [`EphemeralNotifier`]
//! shows the newest entry immediately, regardless of how long the previous
//! one had left, and owns every dismissal timer so callers never manage
//! timer lifetimes.
//!
//! Two independent mechanisms keep an old timer from clearing a newer
//! toast:
//! 1. showing a new entry cancels the previous entry's dismissal task;
//! 2. a dismissal task only clears the display if the displayed entry's
//!    identity is still the one it was scheduled for.

use futures::future::{self, Either};
use futures_signals::signal::{Mutable, Signal};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::effects::{TaskSpawner, TimeEffects};

/// Default time a toast stays on screen.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 2_000;

/// Opaque identity of one shown toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Visual theme of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastTheme {
    /// Operation completed
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    #[default]
    Info,
}

impl ToastTheme {
    /// Short label for logs and plain-text frontends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A displayed toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEntry {
    /// Identity used by the dismissal check
    pub id: ToastId,
    /// User-facing text
    pub message: String,
    /// Visual theme
    pub theme: ToastTheme,
    /// How long the toast stays up
    pub duration_ms: u64,
    /// Clock reading when the toast was shown
    pub shown_at_ms: u64,
}

#[derive(Debug, Default)]
struct NotifierState {
    next_id: u64,
    /// Cancels the dismissal task of the displayed entry
    dismissal: Option<CancelToken>,
}

/// Single-slot, self-dismissing notification display.
pub struct EphemeralNotifier {
    display: Mutable<Option<ToastEntry>>,
    state: Mutex<NotifierState>,
    time: Arc<dyn TimeEffects>,
    spawner: Arc<dyn TaskSpawner>,
}

impl EphemeralNotifier {
    /// Create an empty notifier.
    pub fn new(time: Arc<dyn TimeEffects>, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self {
            display: Mutable::new(None),
            state: Mutex::new(NotifierState::default()),
            time,
            spawner,
        }
    }

    /// Show `message`, replacing whatever is displayed, and schedule its
    /// dismissal after `duration_ms`.
    pub fn notify(
        &self,
        message: impl Into<String>,
        theme: ToastTheme,
        duration_ms: u64,
    ) -> ToastId {
        let token = CancelToken::new();
        let entry = {
            let mut state = self.state.lock();
            state.next_id += 1;
            if let Some(previous) = state.dismissal.replace(token.clone()) {
                previous.cancel();
            }

            let entry = ToastEntry {
                id: ToastId(state.next_id),
                message: message.into(),
                theme,
                duration_ms,
                shown_at_ms: self.time.now_ms(),
            };
            // Set under the state lock so the displayed entry always has the
            // highest issued id.
            self.display.set(Some(entry.clone()));
            entry
        };

        tracing::debug!(
            id = %entry.id,
            theme = entry.theme.label(),
            duration_ms,
            "toast shown"
        );

        let id = entry.id;
        let display = self.display.clone();
        let time = Arc::clone(&self.time);
        self.spawner.spawn(Box::pin(async move {
            let sleep = time.sleep_ms(duration_ms);
            let cancelled = token.cancelled();
            futures::pin_mut!(sleep, cancelled);
            if let Either::Left(_) = future::select(sleep, cancelled).await {
                clear_if_displayed(&display, id);
            }
        }));

        id
    }

    /// The displayed entry, if any.
    pub fn current(&self) -> Option<ToastEntry> {
        self.display.get_cloned()
    }

    /// Signal of the displayed entry for reactive frontends.
    pub fn signal(&self) -> impl Signal<Item = Option<ToastEntry>> {
        self.display.signal_cloned()
    }

    /// Dismiss `id` early. Returns `false` if a different entry (or none)
    /// is displayed.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut state = self.state.lock();
        if !clear_if_displayed(&self.display, id) {
            return false;
        }
        if let Some(token) = state.dismissal.take() {
            token.cancel();
        }
        true
    }

    /// Clear the display and cancel its pending dismissal.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        if let Some(token) = state.dismissal.take() {
            token.cancel();
        }
        self.display.set(None);
    }
}

impl fmt::Debug for EphemeralNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralNotifier")
            .field("display", &self.display.get_cloned())
            .finish_non_exhaustive()
    }
}

fn clear_if_displayed(display: &Mutable<Option<ToastEntry>>, id: ToastId) -> bool {
    let mut current = display.lock_mut();
    if current.as_ref().map(|entry| entry.id) == Some(id) {
        *current = None;
        tracing::debug!(%id, "toast dismissed");
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TokioClock, TokioSpawner};
    use tokio::time::{sleep, Duration};

    fn notifier() -> EphemeralNotifier {
        EphemeralNotifier::new(Arc::new(TokioClock::new()), Arc::new(TokioSpawner))
    }

    fn displayed(notifier: &EphemeralNotifier) -> Option<String> {
        notifier.current().map(|entry| entry.message)
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_dismisses_after_duration() {
        let notifier = notifier();
        notifier.notify("Saved", ToastTheme::Success, 2_000);

        sleep(Duration::from_millis(1_900)).await;
        assert_eq!(displayed(&notifier).as_deref(), Some("Saved"));

        sleep(Duration::from_millis(200)).await;
        assert_eq!(displayed(&notifier), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseding_toast_survives_old_timer() {
        let notifier = notifier();
        notifier.notify("A", ToastTheme::Info, 2_000);

        sleep(Duration::from_millis(500)).await;
        notifier.notify("B", ToastTheme::Info, 2_000);
        assert_eq!(displayed(&notifier).as_deref(), Some("B"));

        // A's timer would have fired at t=2000
        sleep(Duration::from_millis(1_600)).await;
        assert_eq!(displayed(&notifier).as_deref(), Some("B"));

        // B's own timer fires at t=2500
        sleep(Duration::from_millis(500)).await;
        assert_eq!(displayed(&notifier), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_fire_only_last_remains() {
        let notifier = notifier();
        for i in 0..5 {
            notifier.notify(format!("toast {i}"), ToastTheme::Info, 2_000);
            sleep(Duration::from_millis(100)).await;
        }

        assert_eq!(displayed(&notifier).as_deref(), Some("toast 4"));
        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(displayed(&notifier), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_checks_identity() {
        let notifier = notifier();
        let first = notifier.notify("A", ToastTheme::Error, 2_000);
        let second = notifier.notify("B", ToastTheme::Error, 2_000);

        assert!(!notifier.dismiss(first));
        assert_eq!(displayed(&notifier).as_deref(), Some("B"));

        assert!(notifier.dismiss(second));
        assert_eq!(displayed(&notifier), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique_and_increasing() {
        let notifier = notifier();
        let a = notifier.notify("A", ToastTheme::Info, 10);
        let b = notifier.notify("B", ToastTheme::Info, 10);
        assert!(b > a);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_dismissal() {
        let notifier = notifier();
        notifier.notify("A", ToastTheme::Info, 2_000);
        notifier.clear();
        assert_eq!(displayed(&notifier), None);

        let id = notifier.notify("B", ToastTheme::Info, 5_000);
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(notifier.current().map(|entry| entry.id), Some(id));
    }
}
