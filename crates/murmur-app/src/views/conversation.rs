//! # Conversation View State
//!
//! The active conversation as a frontend renders it. Messages are owned
//! snapshots so a view can outlive the session lock it was built under.

use crate::directory::UserDirectory;
use murmur_chat::{highlight, ConversationKey, Message};
use murmur_core::UserId;
use serde::Serialize;

/// Emojis offered in the quick reaction picker
pub const QUICK_REACTIONS: [&str; 7] = ["👍", "❤️", "😂", "😮", "😢", "🙏", "🔥"];

/// One displayed message with its presentation helpers resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Stable list key (confirmed id, else temp id)
    pub render_key: String,
    /// The message itself
    pub message: Message,
    /// Whether the local user sent it
    pub is_own: bool,
    /// Escaped body with search matches marked, for text messages
    pub body_html: Option<String>,
    /// Escaped file name with search matches marked, for file messages
    pub file_name_html: Option<String>,
    /// Whether the file should render inline as an image
    pub is_image: bool,
    /// Delivery label (`Sending...`, `Delivered`, `Read by N`)
    pub delivery: String,
    /// (emoji, count) pairs
    pub reactions: Vec<(String, usize)>,
    /// Sender avatar from the presence list
    pub sender_avatar: Option<String>,
    /// Fallback avatar letter
    pub initial: char,
}

impl MessageView {
    fn build(
        message: &Message,
        query: &str,
        self_id: Option<&UserId>,
        directory: &UserDirectory,
    ) -> Self {
        let initial = message
            .sender_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('U');
        Self {
            render_key: message.identity.render_key().to_string(),
            is_own: self_id.is_some_and(|me| message.is_from(me)),
            body_html: message.body().map(|b| highlight(b, query)),
            file_name_html: message.file_name().map(|f| highlight(f, query)),
            is_image: message.looks_like_image(),
            delivery: message.delivery_status().label(),
            reactions: message
                .reaction_summary()
                .into_iter()
                .map(|(emoji, count)| (emoji.to_string(), count))
                .collect(),
            sender_avatar: directory.avatar(&message.sender_id).map(str::to_string),
            initial,
            message: message.clone(),
        }
    }

    /// Whether the local user can react yet (reactions need a confirmed id)
    pub fn can_react(&self) -> bool {
        self.message.identity.is_confirmed()
    }
}

/// The active conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    /// Conversation key
    pub key: ConversationKey,
    /// Header label: room name or DM partner
    pub label: String,
    /// DM partner avatar
    pub avatar: Option<String>,
    /// Displayed messages, oldest first
    pub messages: Vec<MessageView>,
    /// Display names of users typing here
    pub typing: Vec<String>,
    /// Query the messages were searched and highlighted with
    pub query: String,
}

impl ConversationView {
    /// Build a view from reduced messages. Typing names start empty.
    pub fn new(
        key: ConversationKey,
        label: String,
        avatar: Option<String>,
        messages: &[&Message],
        query: &str,
        self_id: Option<&UserId>,
        directory: &UserDirectory,
    ) -> Self {
        let query = if query.trim().is_empty() { "" } else { query };
        Self {
            key,
            label,
            avatar,
            messages: messages
                .iter()
                .map(|m| MessageView::build(m, query, self_id, directory))
                .collect(),
            typing: Vec::new(),
            query: query.to_string(),
        }
    }

    /// Number of displayed messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing is displayed
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Typing line, e.g. `Ann is typing...`
    pub fn typing_line(&self) -> Option<String> {
        match self.typing.as_slice() {
            [] => None,
            [one] => Some(format!("{one} is typing...")),
            many => Some(format!("{} are typing...", many.join(", "))),
        }
    }
}
