//! Murmur Chat - Conversation Domain Logic
//!
//! Pure, synchronous chat semantics. Nothing in this crate performs I/O or
//! holds a transport handle; the application layer feeds it events and asks it
//! for projections.
//!
//! # Pipeline
//!
//! ```text
//! ChatEvent ──► EventLog ──► group() ──► FilterState::apply ──► search ──► sort_chronological
//!                  │
//!                  └─► UnreadTracker (driven by the session)
//! ```
//!
//! # Modules
//!
//! - [`key`]: [`ConversationKey`] and direct-key derivation
//! - [`message`]: Validated [`Message`] model
//! - [`events`]: Inbound [`ChatEvent`] wire shapes and record validation
//! - [`ingest`]: Append-only [`EventLog`] and conversation grouping
//! - [`unread`]: [`UnreadTracker`]
//! - [`filter`]: Structured filters ([`FilterState`])
//! - [`search`]: Free-text search and highlighting
//! - [`sort`]: Chronological ordering

#![forbid(unsafe_code)]

pub mod events;
pub mod filter;
pub mod ingest;
pub mod key;
pub mod message;
pub mod search;
pub mod sort;
pub mod unread;

pub use events::{
    ChatEvent, MessageRecord, Participant, ReactionToggle, ReadReceipt, RecordError, TypingNotice,
};
pub use filter::{FilterError, FilterMode, FilterState};
pub use ingest::{
    group, group_with_stats, ConversationGroups, ConversationKeyResolver, EventLog, GroupingStats,
    LoggedMessage, RejectedRecord,
};
pub use key::{
    derive_direct_key, visible_rooms, ConversationKey, KeyError, DEFAULT_ROOM, DIRECT_DELIMITER,
    DIRECT_PREFIX,
};
pub use message::{DeliveryStatus, Message, MessageContent, MessageIdentity, MessageKind};
pub use search::{escape_html, highlight, search};
pub use sort::{sort_chronological, sorted_chronological};
pub use unread::UnreadTracker;
