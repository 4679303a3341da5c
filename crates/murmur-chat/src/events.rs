//! # Inbound Chat Events
//!
//! Wire shapes of everything the transport pushes at the client. Records are
//! deliberately loose here (every field optional) and only become a
//! [`Message`] through [`MessageRecord::into_message`], which is the single
//! validation point for message kinds.

use crate::key::ConversationKey;
use crate::message::{Message, MessageContent, MessageIdentity};
use murmur_core::{MessageId, TempId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Errors
// ============================================================================

/// Reasons a message record is rejected at ingestion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Neither a confirmed id nor a temp id
    #[error("message record has neither id nor tempId")]
    MissingIdentity,

    /// No sender id
    #[error("message record has no senderId")]
    MissingSender,

    /// Text message without a body
    #[error("text message has no body")]
    MissingBody,

    /// File message without a URL
    #[error("file message has no url")]
    MissingFileUrl,

    /// `type` is neither `text` nor `file`
    #[error("unknown message type '{kind}'")]
    UnknownKind {
        /// Value received
        kind: String,
    },
}

impl From<RecordError> for murmur_core::MurmurError {
    fn from(err: RecordError) -> Self {
        murmur_core::MurmurError::invalid(err.to_string())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A message as received from the transport, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageRecord {
    /// Server id (`_id` is accepted too)
    #[serde(alias = "_id")]
    pub id: Option<String>,
    /// Client-generated id of a local echo
    pub temp_id: Option<String>,
    /// Sender id
    pub sender_id: Option<String>,
    /// Sender display name
    pub sender: Option<String>,
    /// Room name
    pub room: Option<String>,
    /// Recipient id for direct messages
    pub receiver_id: Option<String>,
    /// Direct message flag
    pub is_private: bool,
    /// Key precomputed by the transport
    pub dm_key: Option<String>,
    /// Text body
    pub message: Option<String>,
    /// `text` or `file`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// File URL
    pub url: Option<String>,
    /// File name
    pub file_name: Option<String>,
    /// ISO timestamp
    pub timestamp: Option<String>,
    /// Emoji → reactor ids
    pub reactions: Option<BTreeMap<String, Vec<String>>>,
    /// Reader ids
    pub read_by: Option<Vec<String>>,
    /// Delivery acknowledgement
    pub delivered: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl MessageRecord {
    /// Validate the record and build a [`Message`].
    ///
    /// A missing `type` is inferred: a record with a URL and no body is a file,
    /// anything else is text. An attached `dmKey` that does not parse is
    /// dropped so routing falls back to the sender/receiver pair.
    pub fn into_message(self) -> Result<Message, RecordError> {
        let id = non_blank(self.id).map(MessageId::new);
        let temp_id = non_blank(self.temp_id).map(TempId::new);
        if id.is_none() && temp_id.is_none() {
            return Err(RecordError::MissingIdentity);
        }

        let sender_id = non_blank(self.sender_id).ok_or(RecordError::MissingSender)?;

        let kind = match self.kind.as_deref() {
            Some(kind) => kind.to_string(),
            None if self.message.is_none() && self.url.is_some() => "file".to_string(),
            None => "text".to_string(),
        };
        let content = match kind.as_str() {
            "text" => MessageContent::Text {
                body: self.message.ok_or(RecordError::MissingBody)?,
            },
            "file" => MessageContent::File {
                url: non_blank(self.url).ok_or(RecordError::MissingFileUrl)?,
                file_name: non_blank(self.file_name),
            },
            _ => return Err(RecordError::UnknownKind { kind }),
        };

        let dm_key = self.dm_key.as_deref().and_then(|raw| {
            ConversationKey::parse(raw)
                .ok()
                .filter(ConversationKey::is_direct)
        });

        let reactions = self
            .reactions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(emoji, users)| {
                let users: BTreeSet<UserId> = users.into_iter().map(UserId::from).collect();
                (!users.is_empty()).then_some((emoji, users))
            })
            .collect();

        Ok(Message {
            identity: MessageIdentity { id, temp_id },
            sender_name: self.sender.unwrap_or_else(|| sender_id.clone()),
            sender_id: UserId::from(sender_id),
            room: non_blank(self.room),
            receiver_id: non_blank(self.receiver_id).map(UserId::from),
            is_direct: self.is_private,
            dm_key,
            content,
            timestamp: Timestamp::parse(self.timestamp.unwrap_or_default()),
            read_by: self
                .read_by
                .unwrap_or_default()
                .into_iter()
                .map(UserId::from)
                .collect(),
            reactions,
            delivered: self.delivered.unwrap_or(false),
        })
    }
}

/// Someone toggled an emoji on a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggle {
    /// Target message (confirmed id or temp id)
    pub message_id: String,
    /// Emoji toggled
    pub emoji: String,
    /// Who toggled it
    pub user_id: UserId,
}

/// Someone saw a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    /// Target message
    pub message_id: String,
    /// Reader
    pub user_id: UserId,
}

/// A connected user as reported by the presence list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// User id
    pub id: UserId,
    /// Display name
    pub username: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Presence flag
    #[serde(default)]
    pub online: bool,
}

/// Typing indicator change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    /// Who is typing
    pub user_id: UserId,
    /// Their display name
    pub username: String,
    /// Conversation they are typing in
    pub conversation_key: String,
    /// Started or stopped
    pub is_typing: bool,
}

// ============================================================================
// Event envelope
// ============================================================================

/// Everything the transport can deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ChatEvent {
    /// A new (or echoed) message
    Message(MessageRecord),
    /// Emoji toggle on an existing message
    ReactionToggle(ReactionToggle),
    /// Read receipt for an existing message
    ReadReceipt(ReadReceipt),
    /// Full presence list
    Users {
        /// Connected users
        users: Vec<Participant>,
    },
    /// Full room list
    Rooms {
        /// Room names, possibly including reserved ones
        rooms: Vec<String>,
    },
    /// Typing indicator change
    Typing(TypingNotice),
}

impl ChatEvent {
    /// Decode an event from its JSON form
    pub fn from_json(raw: &str) -> murmur_core::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::ReactionToggle(_) => "reaction-toggle",
            Self::ReadReceipt(_) => "read-receipt",
            Self::Users { .. } => "users",
            Self::Rooms { .. } => "rooms",
            Self::Typing(_) => "typing",
        }
    }
}
