//! # View Reducer
//!
//! Reduces the session's event log into what the frontend shows.
//!
//! ```text
//! ChatEvent → [EventLog] → group → filter → search → sort → ConversationView
//! ```
//!
//! Nothing here is cached. Every call recomputes from the log, so a view can
//! never drift from the events it was built from.

use murmur_chat::{
    group, search, sort_chronological, ConversationKey, ConversationKeyResolver, EventLog,
    FilterState, Message, RecordError,
};

/// What a single inbound event changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDelta {
    /// A message joined a conversation
    MessageAdded {
        /// Conversation it was routed to
        key: ConversationKey,
        /// Unread count of that conversation afterwards
        unread: u32,
    },
    /// A message matched one already shown (duplicate delivery or confirmation)
    MessageMerged {
        /// Conversation of the existing message
        key: ConversationKey,
    },
    /// A message with no resolvable conversation; kept in the log only
    MessageUnroutable,
    /// A record that failed validation
    MessageRejected {
        /// Why
        error: RecordError,
    },
    /// A reaction toggle was applied
    ReactionToggled {
        /// Target message reference
        message_id: String,
        /// Logged copies touched
        touched: usize,
    },
    /// A read receipt was applied
    ReadReceiptApplied {
        /// Target message reference
        message_id: String,
        /// Logged copies touched
        touched: usize,
    },
    /// The presence list was replaced
    PresenceUpdated {
        /// Users now known
        users: usize,
    },
    /// The room list was replaced
    RoomsUpdated {
        /// Rooms shown after hiding reserved names
        visible: usize,
    },
    /// Someone started or stopped typing
    TypingChanged {
        /// Conversation affected
        key: ConversationKey,
    },
    /// The event did not change anything visible
    Ignored,
}

/// Messages of `active` as displayed: filtered, searched, then sorted.
pub fn reduce_view<'a>(
    log: &'a EventLog,
    resolver: &ConversationKeyResolver,
    filter: &FilterState,
    active: &ConversationKey,
) -> Vec<&'a Message> {
    let mut groups = group(log, resolver);
    let Some(conversation) = groups.swap_remove(active) else {
        return Vec::new();
    };
    let filtered = filter.apply(conversation);
    let mut shown = search(filtered, &filter.query);
    sort_chronological(&mut shown);
    shown
}
