//! File upload seam

use async_trait::async_trait;
use murmur_core::MurmurError;
use serde::{Deserialize, Serialize};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Where the file can be fetched
    pub url: String,
}

/// Upload failures. None of them ingest anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The endpoint answered with a non-success status
    #[error("upload rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },

    /// The endpoint answered without a usable URL
    #[error("upload response carried no url")]
    MissingUrl,

    /// The request did not complete in time
    #[error("upload timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u32,
    },

    /// Connection level failure
    #[error("upload failed: {message}")]
    Network {
        /// Description from the HTTP client
        message: String,
    },

    /// Nothing to upload
    #[error("refusing to upload an empty file")]
    Empty,
}

impl UploadError {
    /// Whether retrying the same upload may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Rejected { status } => *status >= 500,
            Self::MissingUrl | Self::Empty => false,
        }
    }
}

impl From<UploadError> for MurmurError {
    fn from(err: UploadError) -> Self {
        MurmurError::network(err.to_string())
    }
}

/// Turns file bytes into a URL the chat server can share
#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Upload `bytes` under `file_name`
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedFile, UploadError>;
}
