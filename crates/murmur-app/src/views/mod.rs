//! # Views
//!
//! Render-ready projections of the session. Frontends read these and never
//! reach into the event log directly.

pub mod conversation;
pub mod sidebar;

pub use conversation::{ConversationView, MessageView, QUICK_REACTIONS};
pub use sidebar::{DirectEntry, RoomEntry, SidebarView};
