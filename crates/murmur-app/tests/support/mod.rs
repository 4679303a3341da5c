//! Mock collaborators for murmur-app integration tests.
//!
//! - [`RecordingTransport`]: keeps every command it was asked to send
//! - [`MemoryUploader`]: returns a fixed URL or a fixed error

#![allow(dead_code)]

use async_trait::async_trait;
use murmur_app::{
    ChatSession, ChatTransport, FileUploader, SharedSession, TransportCommand, TransportError,
    UploadError, UploadedFile,
};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Transport
// ============================================================================

/// Transport that records commands instead of sending them
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<TransportCommand>>,
    fail_on: Mutex<Option<&'static str>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every command with the given wire name
    pub fn failing_on(command: &'static str) -> Self {
        let transport = Self::default();
        *transport.fail_on.lock() = Some(command);
        transport
    }

    /// Stop rejecting commands
    pub fn heal(&self) {
        *self.fail_on.lock() = None;
    }

    /// Commands delivered so far
    pub fn sent(&self) -> Vec<TransportCommand> {
        self.sent.lock().clone()
    }

    /// Wire names of the commands delivered so far
    pub fn sent_names(&self) -> Vec<&'static str> {
        self.sent.lock().iter().map(TransportCommand::name).collect()
    }

    /// Forget recorded commands
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, command: TransportCommand) -> Result<(), TransportError> {
        if *self.fail_on.lock() == Some(command.name()) {
            return Err(TransportError::Rejected {
                command: command.name().to_string(),
                reason: "test rejection".to_string(),
            });
        }
        self.sent.lock().push(command);
        Ok(())
    }
}

// ============================================================================
// Uploader
// ============================================================================

/// Uploader answering from memory
pub struct MemoryUploader {
    outcome: Result<String, UploadError>,
    uploads: Mutex<Vec<(String, usize)>>,
}

impl MemoryUploader {
    /// Every upload lands at `url`
    pub fn succeeding(url: &str) -> Self {
        Self {
            outcome: Ok(url.to_string()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Every upload fails with `error`
    pub fn failing(error: UploadError) -> Self {
        Self {
            outcome: Err(error),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// (file name, byte count) of every attempted upload
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl FileUploader for MemoryUploader {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedFile, UploadError> {
        self.uploads.lock().push((file_name.to_string(), bytes.len()));
        self.outcome.clone().map(|url| UploadedFile { url })
    }
}

// ============================================================================
// Session
// ============================================================================

/// Fresh shared session with default configuration
pub fn shared_session() -> SharedSession {
    Arc::new(Mutex::new(ChatSession::default()))
}
