//! Per-conversation unread counters

use crate::key::ConversationKey;
use crate::message::Message;
use murmur_core::UserId;
use std::collections::HashMap;

/// Unread message counts, one per conversation that has any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnreadTracker {
    counts: HashMap<ConversationKey, u32>,
}

impl UnreadTracker {
    /// Tracker with no unread messages
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a newly arrived message and return the conversation's count.
    ///
    /// Only messages from others in a conversation that is not being viewed count.
    pub fn on_message_arrived(
        &mut self,
        key: &ConversationKey,
        is_from_self: bool,
        is_active: bool,
    ) -> u32 {
        if is_from_self || is_active {
            return self.get(key);
        }
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Zero the count of one conversation
    pub fn clear(&mut self, key: &ConversationKey) {
        self.counts.remove(key);
    }

    /// Current count, 0 for unknown conversations
    #[must_use]
    pub fn get(&self, key: &ConversationKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum across all conversations
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Forget every count (logout, reconnect)
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Zero the count if `self_id` has read every message others sent in the conversation.
    ///
    /// Returns whether the count was cleared.
    pub fn close_if_read<'a, I>(
        &mut self,
        key: &ConversationKey,
        messages: I,
        self_id: &UserId,
    ) -> bool
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let all_read = messages
            .into_iter()
            .filter(|m| !m.is_from(self_id))
            .all(|m| m.is_read_by(self_id));
        if all_read && self.counts.contains_key(key) {
            self.clear(key);
            return true;
        }
        false
    }

    /// Conversations with a non-zero count
    pub fn iter(&self) -> impl Iterator<Item = (&ConversationKey, u32)> {
        self.counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(k, n)| (k, *n))
    }
}
