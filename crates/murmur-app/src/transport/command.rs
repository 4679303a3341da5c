//! Outbound command model

use murmur_chat::ConversationKey;
use murmur_core::{MessageId, TempId, UserId};
use serde::{Deserialize, Serialize};

/// A shared file, after upload, addressed to a room or a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Direct share
    pub is_private: bool,
    /// Target room for room shares
    pub room: Option<String>,
    /// Recipient for direct shares
    pub receiver_id: Option<UserId>,
    /// Where the upload landed
    pub url: String,
    /// Original file name
    pub file_name: String,
    /// Id of the local echo, echoed back by the server
    pub temp_id: TempId,
}

/// Everything the client asks the server to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TransportCommand {
    /// Subscribe to a room
    JoinRoom {
        /// Room name
        room: String,
    },
    /// Post text to a room
    SendMessage {
        /// Trimmed text
        text: String,
        /// Room name
        room: String,
        /// Id of the local echo
        #[serde(rename = "tempId")]
        temp_id: TempId,
    },
    /// Send text to one user
    #[serde(rename = "privateMessage")]
    SendPrivateMessage {
        /// Recipient
        to: UserId,
        /// Trimmed text
        text: String,
        /// Id of the local echo
        #[serde(rename = "tempId")]
        temp_id: TempId,
    },
    /// Share an uploaded file
    SendFile(FileDescriptor),
    /// Tell the sender a message was seen
    #[serde(rename = "readReceipt")]
    SendReadReceipt {
        /// Confirmed id of the message
        #[serde(rename = "messageId")]
        message_id: MessageId,
    },
    /// Toggle an emoji on a message
    #[serde(rename = "reaction")]
    SendReaction {
        /// Confirmed id of the message
        #[serde(rename = "messageId")]
        message_id: MessageId,
        /// Emoji to toggle
        emoji: String,
    },
    /// Start or stop the typing indicator
    #[serde(rename = "typing")]
    SetTyping {
        /// Whether the user is typing
        #[serde(rename = "isTyping")]
        is_typing: bool,
        /// Conversation being typed in
        key: ConversationKey,
    },
}

impl TransportCommand {
    /// Wire event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "joinRoom",
            Self::SendMessage { .. } => "sendMessage",
            Self::SendPrivateMessage { .. } => "privateMessage",
            Self::SendFile(_) => "sendFile",
            Self::SendReadReceipt { .. } => "readReceipt",
            Self::SendReaction { .. } => "reaction",
            Self::SetTyping { .. } => "typing",
        }
    }

    /// JSON form, as the transport puts it on the wire
    pub fn to_json(&self) -> murmur_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
