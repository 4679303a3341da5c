//! Identifier types used across Murmur
//!
//! Every identifier here is issued by the transport (or, for [`TempId`], by the
//! local client before the transport confirms a send). They are opaque strings;
//! the newtypes only keep a sender id from being passed where a message id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identifier as assigned by the transport
///
/// Ordering is plain lexicographic string ordering, which is what direct
/// conversation keys are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the transport left this identifier blank
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Server-assigned message identifier
///
/// Present only once the transport has confirmed a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new message ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Client-generated provisional identifier for an optimistically echoed message
///
/// The transport copies it onto the confirmed message so the two can be
/// reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TempId(pub String);

impl TempId {
    /// Create a temp ID from an existing string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random temp ID for a local send
    pub fn generate() -> Self {
        Self(format!("tmp-{}", Uuid::new_v4()))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TempId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display_is_verbatim() {
        let id = UserId::new("socket-abc");
        assert_eq!(id.to_string(), "socket-abc");
        assert_eq!(id.as_str(), "socket-abc");
    }

    #[test]
    fn test_user_id_ordering_is_lexicographic() {
        assert!(UserId::from("u1") < UserId::from("u2"));
        assert!(UserId::from("B") < UserId::from("a"));
    }

    #[test]
    fn test_generated_temp_ids_are_unique() {
        let a = TempId::generate();
        let b = TempId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tmp-"));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&MessageId::new("m1")).unwrap();
        assert_eq!(json, "\"m1\"");
        let back: UserId = serde_json::from_str("\"u9\"").unwrap();
        assert_eq!(back, UserId::new("u9"));
    }
}
