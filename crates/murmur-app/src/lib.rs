//! # Murmur App - Portable Headless Application Core
//!
//! Everything a Murmur chat frontend needs short of drawing pixels and
//! owning a socket.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Frontend (terminal, web, desktop)            │
//! │  renders views, implements ChatTransport     │
//! └────────────────────┬─────────────────────────┘
//!                      │ ChatEvent / TransportCommand
//! ┌────────────────────▼─────────────────────────┐
//! │ murmur-app                                   │
//! │  workflows ─► ChatSession ─► reduce_view     │
//! │                    │                         │
//! │             views (Conversation, Sidebar)    │
//! └────────────────────┬─────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────┐
//! │ murmur-chat (keys, log, filter, search, sort)│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use murmur_app::{workflows, AppConfig, ChatSession};
//! use murmur_core::config::MurmurConfig;
//! use parking_lot::Mutex;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = AppConfig::load(Some(Path::new("murmur.toml")))?;
//! murmur_app::logging::init(&config.log_filter)?;
//! let session = Arc::new(Mutex::new(ChatSession::from_config(&config)?));
//!
//! workflows::connect(&session, &transport, "u1".into()).await?;
//! workflows::send_text(&session, &transport, "hello").await?;
//! let view = session.lock().view();
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod directory;
pub mod errors;
pub mod logging;
pub mod transport;
pub mod views;
pub mod workflows;

pub use crate::config::{AppConfig, UploadConfig};
pub use crate::core::{
    reduce_view, Activation, ActivationState, ChatSession, EventOutcome, ViewDelta,
};
pub use crate::directory::UserDirectory;
pub use crate::errors::{AppError, ErrorCategory};
#[cfg(feature = "http")]
pub use crate::transport::HttpUploader;
pub use crate::transport::{
    ChatTransport, FileDescriptor, FileUploader, TransportCommand, TransportError, UploadError,
    UploadedFile,
};
pub use crate::views::{
    ConversationView, DirectEntry, MessageView, RoomEntry, SidebarView, QUICK_REACTIONS,
};
pub use crate::workflows::SharedSession;
