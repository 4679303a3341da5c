//! # Collaborator Seams
//!
//! The application core never talks to a socket or an HTTP client directly.
//! It produces [`TransportCommand`]s and hands them to a [`ChatTransport`]
//! supplied by the frontend; file bytes go through a [`FileUploader`].

mod command;
#[cfg(feature = "http")]
mod http;
mod upload;

pub use command::{FileDescriptor, TransportCommand};
#[cfg(feature = "http")]
pub use http::HttpUploader;
pub use upload::{FileUploader, UploadError, UploadedFile};

use async_trait::async_trait;
use murmur_core::MurmurError;

/// Failures reported by a [`ChatTransport`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No live connection
    #[error("transport disconnected")]
    Disconnected,

    /// The server refused the command
    #[error("{command} rejected: {reason}")]
    Rejected {
        /// Wire name of the command
        command: String,
        /// Server supplied reason
        reason: String,
    },

    /// Lower-level I/O failure
    #[error("transport I/O error: {message}")]
    Io {
        /// Description from the transport
        message: String,
    },
}

impl From<TransportError> for MurmurError {
    fn from(err: TransportError) -> Self {
        MurmurError::network(err.to_string())
    }
}

/// Outbound half of the real-time connection
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one command to the server
    async fn send(&self, command: TransportCommand) -> Result<(), TransportError>;
}
