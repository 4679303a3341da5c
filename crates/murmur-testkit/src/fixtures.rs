//! Message and presence fixtures
//!
//! [`RecordBuilder`] produces transport records the way the server would send
//! them, so tests exercise the same validation path as production ingestion.

use murmur_chat::{ChatEvent, Message, MessageRecord, Participant};
use murmur_core::UserId;

/// Timestamp used when a test does not care
pub const DEFAULT_TIMESTAMP: &str = "2024-05-01T10:00:00.000Z";

/// Fluent builder for [`MessageRecord`]s
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: MessageRecord,
}

impl RecordBuilder {
    fn base(sender: &str) -> Self {
        Self {
            record: MessageRecord {
                sender_id: Some(sender.to_string()),
                sender: Some(display_name(sender)),
                timestamp: Some(DEFAULT_TIMESTAMP.to_string()),
                ..Default::default()
            },
        }
    }

    /// Confirmed text message
    pub fn text(id: &str, sender: &str, body: &str) -> Self {
        let mut builder = Self::base(sender);
        builder.record.id = Some(id.to_string());
        builder.record.kind = Some("text".to_string());
        builder.record.message = Some(body.to_string());
        builder
    }

    /// Confirmed file share
    pub fn file(id: &str, sender: &str, url: &str, file_name: &str) -> Self {
        let mut builder = Self::base(sender);
        builder.record.id = Some(id.to_string());
        builder.record.kind = Some("file".to_string());
        builder.record.url = Some(url.to_string());
        builder.record.file_name = Some(file_name.to_string());
        builder
    }

    /// Unconfirmed local echo carrying only a temp id
    pub fn provisional(temp_id: &str, sender: &str, body: &str) -> Self {
        let mut builder = Self::base(sender);
        builder.record.temp_id = Some(temp_id.to_string());
        builder.record.kind = Some("text".to_string());
        builder.record.message = Some(body.to_string());
        builder
    }

    /// Post to a room
    pub fn in_room(mut self, room: &str) -> Self {
        self.record.room = Some(room.to_string());
        self.record.is_private = false;
        self
    }

    /// Make it a direct message to `receiver`
    pub fn direct_to(mut self, receiver: &str) -> Self {
        self.record.receiver_id = Some(receiver.to_string());
        self.record.is_private = true;
        self.record.room = None;
        self
    }

    /// Attach a transport-derived DM key
    pub fn with_dm_key(mut self, key: &str) -> Self {
        self.record.dm_key = Some(key.to_string());
        self
    }

    /// Attach a temp id (server echo of a local send)
    pub fn with_temp_id(mut self, temp_id: &str) -> Self {
        self.record.temp_id = Some(temp_id.to_string());
        self
    }

    /// Override the sender display name
    pub fn sender_name(mut self, name: &str) -> Self {
        self.record.sender = Some(name.to_string());
        self
    }

    /// Set the raw timestamp
    pub fn at(mut self, timestamp: &str) -> Self {
        self.record.timestamp = Some(timestamp.to_string());
        self
    }

    /// Add a reader
    pub fn read_by(mut self, reader: &str) -> Self {
        self.record
            .read_by
            .get_or_insert_with(Vec::new)
            .push(reader.to_string());
        self
    }

    /// Mark delivered
    pub fn delivered(mut self) -> Self {
        self.record.delivered = Some(true);
        self
    }

    /// The raw record
    pub fn record(self) -> MessageRecord {
        self.record
    }

    /// The validated message; panics if the record is invalid
    pub fn message(self) -> Message {
        self.record
            .into_message()
            .expect("fixture record should validate")
    }

    /// Wrapped as an inbound `message` event
    pub fn event(self) -> ChatEvent {
        ChatEvent::Message(self.record)
    }
}

/// Capitalized display name derived from an id (`u1` → `U1`)
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Presence entry
pub fn participant(id: &str, username: &str, online: bool) -> Participant {
    Participant {
        id: UserId::from(id),
        username: username.to_string(),
        avatar: Some(format!("https://avatars.test/{id}.png")),
        online,
    }
}

/// `users` event for the given participants
pub fn users_event(users: Vec<Participant>) -> ChatEvent {
    ChatEvent::Users { users }
}

/// `rooms` event
pub fn rooms_event(rooms: &[&str]) -> ChatEvent {
    ChatEvent::Rooms {
        rooms: rooms.iter().map(|r| (*r).to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_produces_valid_messages() {
        let msg = RecordBuilder::text("m1", "u1", "hi").in_room("Random").message();
        assert_eq!(msg.room.as_deref(), Some("Random"));
        assert_eq!(msg.sender_name, "U1");

        let dm = RecordBuilder::provisional("tmp-1", "u1", "psst")
            .direct_to("u2")
            .message();
        assert!(dm.is_direct);
        assert!(!dm.identity.is_confirmed());
    }
}
