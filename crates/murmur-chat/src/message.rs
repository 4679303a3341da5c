//! # Chat Message Model
//!
//! Validated messages as held in the event log. Loosely shaped transport
//! records ([`crate::events::MessageRecord`]) are checked once at the ingestion
//! boundary and become a [`Message`] whose content is a tagged union over the
//! two message kinds.

use crate::key::ConversationKey;
use murmur_core::{MessageId, TempId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// File extensions rendered inline as images
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

// ============================================================================
// Identity
// ============================================================================

/// Confirmed and/or provisional identifiers of a message
///
/// A locally sent message starts with only a `temp_id`. The transport echoes
/// it back with a server `id` and the same `temp_id`, which is how the two
/// copies are recognized as one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageIdentity {
    /// Server-assigned id, once confirmed
    pub id: Option<MessageId>,
    /// Client-generated id, for messages that started as a local echo
    pub temp_id: Option<TempId>,
}

impl MessageIdentity {
    /// Identity of a confirmed message
    pub fn confirmed(id: impl Into<MessageId>) -> Self {
        Self {
            id: Some(id.into()),
            temp_id: None,
        }
    }

    /// Identity of an unconfirmed local echo
    pub fn provisional(temp_id: TempId) -> Self {
        Self {
            id: None,
            temp_id: Some(temp_id),
        }
    }

    /// Whether the server has assigned an id
    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }

    /// Whether both identities denote the same message.
    ///
    /// Equal confirmed ids match. Otherwise equal temp ids match, unless both
    /// sides are confirmed under different ids.
    pub fn same_message(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => matches!(
                (&self.temp_id, &other.temp_id),
                (Some(a), Some(b)) if a == b
            ),
        }
    }

    /// Whether a raw id from an annotation event refers to this message
    pub fn answers_to(&self, raw: &str) -> bool {
        self.id.as_ref().is_some_and(|id| id.as_str() == raw)
            || self.temp_id.as_ref().is_some_and(|t| t.as_str() == raw)
    }

    /// Stable key for rendering lists: confirmed id, else temp id
    pub fn render_key(&self) -> &str {
        match (&self.id, &self.temp_id) {
            (Some(id), _) => id.as_str(),
            (None, Some(temp)) => temp.as_str(),
            (None, None) => "",
        }
    }
}

// ============================================================================
// Content
// ============================================================================

/// Message payload, one variant per message kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    /// Plain text
    Text {
        /// Message body
        body: String,
    },
    /// Shared file, already uploaded
    File {
        /// Where the uploaded file can be fetched
        url: String,
        /// Original file name, when the sender supplied one
        #[serde(rename = "fileName")]
        file_name: Option<String>,
    },
}

/// Message kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Text message
    Text,
    /// File share
    File,
}

// ============================================================================
// Delivery status
// ============================================================================

/// Delivery progress shown under a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Not yet acknowledged by the transport
    Sending,
    /// Acknowledged, nobody has read it yet
    Delivered,
    /// Read by this many participants
    Read(usize),
}

impl DeliveryStatus {
    /// Short label for display
    pub fn label(&self) -> String {
        match self {
            Self::Sending => "Sending...".to_string(),
            Self::Delivered => "Delivered".to_string(),
            Self::Read(count) => format!("Read by {count}"),
        }
    }
}

// ============================================================================
// Message
// ============================================================================

/// A validated chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Confirmed and provisional ids
    pub identity: MessageIdentity,
    /// Sender identifier
    pub sender_id: UserId,
    /// Sender display name
    pub sender_name: String,
    /// Room the message was posted to (room messages only)
    pub room: Option<String>,
    /// Recipient (direct messages only)
    pub receiver_id: Option<UserId>,
    /// Whether this is a direct message
    pub is_direct: bool,
    /// Conversation key attached by the transport, if any
    pub dm_key: Option<ConversationKey>,
    /// Payload
    pub content: MessageContent,
    /// When the message was sent
    pub timestamp: Timestamp,
    /// Participants that have seen the message
    #[serde(default)]
    pub read_by: BTreeSet<UserId>,
    /// Emoji → participants that reacted with it
    #[serde(default)]
    pub reactions: BTreeMap<String, BTreeSet<UserId>>,
    /// Whether the transport acknowledged delivery
    #[serde(default)]
    pub delivered: bool,
}

impl Message {
    /// Message kind
    pub fn kind(&self) -> MessageKind {
        match self.content {
            MessageContent::Text { .. } => MessageKind::Text,
            MessageContent::File { .. } => MessageKind::File,
        }
    }

    /// Body text, for text messages
    pub fn body(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { body } => Some(body),
            MessageContent::File { .. } => None,
        }
    }

    /// File URL, for file messages
    pub fn file_url(&self) -> Option<&str> {
        match &self.content {
            MessageContent::File { url, .. } => Some(url),
            MessageContent::Text { .. } => None,
        }
    }

    /// File name, for file messages that carry one
    pub fn file_name(&self) -> Option<&str> {
        match &self.content {
            MessageContent::File { file_name, .. } => file_name.as_deref(),
            MessageContent::Text { .. } => None,
        }
    }

    /// Whether this is a file share
    pub fn is_file(&self) -> bool {
        self.kind() == MessageKind::File
    }

    /// Whether `user` sent this message
    pub fn is_from(&self, user: &UserId) -> bool {
        &self.sender_id == user
    }

    /// Whether `user` has seen this message
    pub fn is_read_by(&self, user: &UserId) -> bool {
        self.read_by.contains(user)
    }

    /// Record that `reader` saw this message. Returns false if already recorded.
    pub fn mark_read_by(&mut self, reader: UserId) -> bool {
        self.read_by.insert(reader)
    }

    /// Toggle `user` in the reactor set for `emoji`. Returns true if the reaction is now present.
    ///
    /// An emoji whose last reactor is removed disappears from the map.
    pub fn toggle_reaction(&mut self, emoji: &str, user: &UserId) -> bool {
        let reactors = self.reactions.entry(emoji.to_string()).or_default();
        if reactors.remove(user) {
            if reactors.is_empty() {
                self.reactions.remove(emoji);
            }
            false
        } else {
            reactors.insert(user.clone());
            true
        }
    }

    /// (emoji, reactor count) pairs, in emoji order
    pub fn reaction_summary(&self) -> Vec<(&str, usize)> {
        self.reactions
            .iter()
            .map(|(emoji, users)| (emoji.as_str(), users.len()))
            .collect()
    }

    /// Delivery progress for display
    pub fn delivery_status(&self) -> DeliveryStatus {
        if !self.read_by.is_empty() {
            DeliveryStatus::Read(self.read_by.len())
        } else if self.delivered {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Sending
        }
    }

    /// Whether the file URL points at an image the UI can inline
    pub fn looks_like_image(&self) -> bool {
        let Some(url) = self.file_url() else {
            return false;
        };
        let lower = url.to_lowercase();
        IMAGE_EXTENSIONS
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> Message {
        Message {
            identity: MessageIdentity::confirmed("m1"),
            sender_id: UserId::from("alice"),
            sender_name: "Alice".to_string(),
            room: Some("General".to_string()),
            receiver_id: None,
            is_direct: false,
            dm_key: None,
            content: MessageContent::Text {
                body: body.to_string(),
            },
            timestamp: Timestamp::parse("2024-05-01T10:00:00Z"),
            read_by: BTreeSet::new(),
            reactions: BTreeMap::new(),
            delivered: false,
        }
    }

    #[test]
    fn test_identity_matching_tiers() {
        let confirmed = MessageIdentity::confirmed("m1");
        assert!(confirmed.same_message(&MessageIdentity::confirmed("m1")));
        assert!(!confirmed.same_message(&MessageIdentity::confirmed("m2")));

        let temp = TempId::from("tmp-1");
        let local = MessageIdentity::provisional(temp.clone());
        let echoed = MessageIdentity {
            id: Some(MessageId::from("m9")),
            temp_id: Some(temp.clone()),
        };
        assert!(local.same_message(&echoed));
        assert!(echoed.same_message(&local));

        // Two confirmed messages never merge through a shared temp id
        let other_confirmed = MessageIdentity {
            id: Some(MessageId::from("m10")),
            temp_id: Some(temp),
        };
        assert!(!echoed.same_message(&other_confirmed));
    }

    #[test]
    fn test_identity_without_shared_ids_is_distinct() {
        let a = MessageIdentity::provisional(TempId::from("tmp-1"));
        let b = MessageIdentity::confirmed("m1");
        assert!(!a.same_message(&b));
    }

    #[test]
    fn test_toggle_reaction_adds_then_removes() {
        let mut msg = text("hi");
        let bob = UserId::from("bob");
        assert!(msg.toggle_reaction("👍", &bob));
        assert_eq!(msg.reaction_summary(), vec![("👍", 1)]);
        assert!(!msg.toggle_reaction("👍", &bob));
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_delivery_status_progression() {
        let mut msg = text("hi");
        assert_eq!(msg.delivery_status().label(), "Sending...");
        msg.delivered = true;
        assert_eq!(msg.delivery_status(), DeliveryStatus::Delivered);
        msg.mark_read_by(UserId::from("bob"));
        msg.mark_read_by(UserId::from("carol"));
        assert_eq!(msg.delivery_status().label(), "Read by 2");
    }

    #[test]
    fn test_image_detection() {
        let mut msg = text("hi");
        assert!(!msg.looks_like_image());
        msg.content = MessageContent::File {
            url: "https://cdn/x/Photo.JPG".to_string(),
            file_name: Some("Photo.JPG".to_string()),
        };
        assert!(msg.looks_like_image());
        msg.content = MessageContent::File {
            url: "https://cdn/x/report.pdf".to_string(),
            file_name: None,
        };
        assert!(!msg.looks_like_image());
    }

    #[test]
    fn test_accessors_follow_kind() {
        let msg = text("hello");
        assert_eq!(msg.kind(), MessageKind::Text);
        assert_eq!(msg.body(), Some("hello"));
        assert_eq!(msg.file_url(), None);
        assert!(msg.is_from(&UserId::from("alice")));
    }
}
