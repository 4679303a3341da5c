//! # Workflows
//!
//! Async operations shared by every frontend. Each computes its commands
//! against the session synchronously, releases the lock, then awaits the
//! collaborators.

pub mod messaging;

pub use messaging::{
    activate_conversation, connect, dispatch, handle_event, send_file, send_text, set_typing,
    toggle_reaction, SharedSession,
};
