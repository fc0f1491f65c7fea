//! Categorized application errors
//!
//! Provides structured error types that enable:
//! - Categorized error handling (network vs auth vs business vs polling)
//! - Appropriate toast theme routing
//! - Human-readable messages that never echo the technical error
//!
//! Stale responses and rejected gate tokens are *not* errors. They surface as
//! [`LoadOutcome::Dropped`](crate::workflows::LoadOutcome) and are never shown.

use std::fmt;

use purse_core::{CoreError, PollError, ToastTheme};

use crate::bridge::ApiError;

/// Server code returned when the account already has the maximum number of
/// deposit addresses on a network.
pub const ADDRESS_LIMIT_REACHED: i64 = 40_031;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connectivity or HTTP failures (often transient)
    Network,
    /// Session or credential failures
    Auth,
    /// Server rejected the request on business grounds
    Business,
    /// An asynchronously materializing resource did not resolve
    Processing,
    /// Invalid local configuration
    Config,
    /// The user or a newer request abandoned the operation
    Cancelled,
}

impl ErrorCategory {
    /// Check if this error category is likely transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::Processing)
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Auth => "Auth",
            Self::Business => "Business",
            Self::Processing => "Processing",
            Self::Config => "Config",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// AppError
// ============================================================================

/// Categorized application errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Network/HTTP failure bubbled up from the transport
    #[error("Transport error ({status}): {message}")]
    Transport {
        /// HTTP status, 0 when no response arrived
        status: u16,
        /// Transport or server detail, for logs only
        message: String,
    },

    /// Credentials rejected by the server
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Server detail, for logs only
        message: String,
    },

    /// Application-level rejection (non-success server code)
    #[error("Server error {code}: {message}")]
    Business {
        /// Server business code
        code: i64,
        /// Server message, for logs only
        message: String,
    },

    /// Resource still pending after the whole attempt budget
    #[error("Resource still pending after {attempts} attempts")]
    PollExhausted {
        /// Probes made
        attempts: u32,
    },

    /// Resource reported an unrecoverable failure
    #[error("Resource failed: {reason}")]
    PollFailed {
        /// Failure reason reported by the resource
        reason: String,
    },

    /// Polling abandoned by the caller
    #[error("Polling cancelled")]
    PollCancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },
}

impl AppError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Category used for routing and logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Network,
            Self::Unauthorized { .. } => ErrorCategory::Auth,
            Self::Business { .. } => ErrorCategory::Business,
            Self::PollExhausted { .. } | Self::PollFailed { .. } => ErrorCategory::Processing,
            Self::PollCancelled => ErrorCategory::Cancelled,
            Self::Config { .. } => ErrorCategory::Config,
        }
    }

    /// Whether the error is control flow that must never reach the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::PollCancelled)
    }

    /// Theme of the toast that reports this error.
    pub fn toast_theme(&self) -> ToastTheme {
        match self {
            // Not a failure yet: the user is asked to check back later
            Self::PollExhausted { .. } => ToastTheme::Info,
            _ => ToastTheme::Error,
        }
    }

    /// Message shown to the user. Never contains the technical detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "Network error, please check your connection and retry",
            Self::Unauthorized { .. } => "Your session has expired, please sign in again",
            Self::Business {
                code: ADDRESS_LIMIT_REACHED,
                ..
            } => "You have reached the address limit for this network",
            Self::Business { .. } => "The request could not be completed, please try again",
            Self::PollExhausted { .. } => "Still processing, please check again shortly",
            Self::PollFailed { .. } => "The order failed and will not be completed",
            Self::PollCancelled => "",
            Self::Config { .. } => "The app is misconfigured",
        }
    }

    /// Short error code string for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "NET_TRANSPORT",
            Self::Unauthorized { .. } => "AUTH_EXPIRED",
            Self::Business {
                code: ADDRESS_LIMIT_REACHED,
                ..
            } => "BIZ_ADDRESS_LIMIT",
            Self::Business { .. } => "BIZ_REJECTED",
            Self::PollExhausted { .. } => "POLL_EXHAUSTED",
            Self::PollFailed { .. } => "POLL_FAILED",
            Self::PollCancelled => "POLL_CANCELLED",
            Self::Config { .. } => "CONFIG",
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let message = err.server_message.clone().unwrap_or_default();
        if err.is_unauthorized() {
            return Self::Unauthorized { message };
        }
        match err.server_code {
            Some(code) if err.http_status != 0 && err.http_status < 500 => {
                Self::Business { code, message }
            }
            _ => Self::Transport {
                status: err.http_status,
                message: err.to_string(),
            },
        }
    }
}

impl From<PollError<AppError>> for AppError {
    fn from(err: PollError<AppError>) -> Self {
        match err {
            PollError::Exhausted { attempts } => Self::PollExhausted { attempts },
            PollError::Failed(inner) => inner,
            PollError::Cancelled { .. } => Self::PollCancelled,
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::config(err.to_string())
    }
}
