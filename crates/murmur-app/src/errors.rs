//! Categorized application errors
//!
//! Provides structured error types that enable:
//! - Categorized error handling (input vs network vs upload)
//! - Recovery hints for user-actionable errors

use crate::transport::{TransportError, UploadError};
use murmur_chat::{FilterError, KeyError};
use murmur_core::MurmurError;
use std::fmt;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
///
/// These categories give every frontend the same classification for
/// choosing how loudly to surface a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors (correctable by modifying settings)
    Config,
    /// Transport connectivity errors (often transient)
    Network,
    /// File upload failures
    Upload,
    /// General operation failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Check if this error category is user-correctable.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Config)
    }

    /// Check if this error category is likely transient.
    ///
    /// Transient errors may resolve on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::Upload)
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::Network => "Network",
            Self::Upload => "Upload",
            Self::Operation => "Operation",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check your input and try again",
            Self::Config => "Review your configuration settings",
            Self::Network => "Check your connection and retry",
            Self::Upload => "The file could not be uploaded; try again",
            Self::Operation => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Application errors
// ============================================================================

/// Errors returned by session operations and workflows
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// A user action could not be carried out as asked
    #[error("{action} - {hint}")]
    UserAction {
        /// What the user tried
        action: String,
        /// How to fix it
        hint: String,
    },

    /// The transport failed to deliver a command
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The upload collaborator failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Lower-layer failure
    #[error(transparent)]
    Core(#[from] MurmurError),
}

impl AppError {
    /// Create a user action error with recovery hint
    pub fn user_action(action: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::UserAction {
            action: action.into(),
            hint: hint.into(),
        }
    }

    /// Category for frontend routing
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UserAction { .. } => ErrorCategory::Input,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Upload(_) => ErrorCategory::Upload,
            Self::Core(err) => match err {
                MurmurError::Invalid { .. } | MurmurError::NotFound { .. } => ErrorCategory::Input,
                MurmurError::Config { .. } => ErrorCategory::Config,
                MurmurError::Network { .. } => ErrorCategory::Network,
                MurmurError::Serialization { .. } | MurmurError::Internal { .. } => {
                    ErrorCategory::Operation
                }
            },
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Upload(err) => err.is_transient(),
            Self::Transport(TransportError::Rejected { .. }) => false,
            other => {
                let category = other.category();
                category.is_transient() || category.is_user_correctable()
            }
        }
    }

    /// Get a short error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserAction { .. } => "USER_ACTION",
            Self::Transport(err) => match err {
                TransportError::Disconnected => "NET_DISCONNECTED",
                TransportError::Rejected { .. } => "NET_REJECTED",
                TransportError::Io { .. } => "NET_IO",
            },
            Self::Upload(err) => match err {
                UploadError::Rejected { .. } => "UPLOAD_REJECTED",
                UploadError::MissingUrl => "UPLOAD_NO_URL",
                UploadError::Timeout { .. } => "UPLOAD_TIMEOUT",
                UploadError::Network { .. } => "UPLOAD_NETWORK",
                UploadError::Empty => "UPLOAD_EMPTY",
            },
            Self::Core(_) => "CORE",
        }
    }
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        Self::Core(err.into())
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        Self::Core(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_action_error() {
        let err = AppError::user_action("Send message", "Open a conversation first");
        assert_eq!(err.to_string(), "Send message - Open a conversation first");
        assert_eq!(err.code(), "USER_ACTION");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_upload_errors_are_categorized() {
        let err = AppError::from(UploadError::Rejected { status: 503 });
        assert_eq!(err.category(), ErrorCategory::Upload);
        assert!(err.is_recoverable());
        assert!(!AppError::from(UploadError::MissingUrl).is_recoverable());
        assert_eq!(err.to_string(), "upload rejected with status 503");
    }

    #[test]
    fn test_transport_errors() {
        let err = AppError::from(TransportError::Disconnected);
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.code(), "NET_DISCONNECTED");
        assert!(err.is_recoverable());
        let rejected = AppError::from(TransportError::Rejected {
            command: "joinRoom".into(),
            reason: "banned".into(),
        });
        assert!(!rejected.is_recoverable());
    }

    #[test]
    fn test_domain_errors_map_to_input() {
        let err = AppError::from(KeyError::Empty);
        assert_eq!(err.category(), ErrorCategory::Input);
        let err = AppError::from(FilterError::InvalidDate { raw: "x".into() });
        assert_eq!(err.category().resolution_hint(), "Check your input and try again");
        assert_eq!(
            AppError::from(MurmurError::config("bad")).category(),
            ErrorCategory::Config
        );
    }
}
