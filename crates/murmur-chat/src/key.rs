//! Conversation keys
//!
//! A [`ConversationKey`] names the group a message belongs to. Rooms use their
//! name verbatim. Direct conversations use `dm_<lo>___<hi>`, where `lo` and `hi`
//! are the two participant ids in lexicographic order, so both participants
//! derive the same key. The `dm_` prefix is reserved: no room may start with
//! it, which keeps the two key spaces disjoint.
//!
//! The prefix and delimiter are wire constants. The transport may attach an
//! already-derived `dmKey` to a message and the client must agree with it.

use murmur_core::UserId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Reserved prefix for direct conversation keys
pub const DIRECT_PREFIX: &str = "dm_";

/// Separator between the two participant ids in a direct key
pub const DIRECT_DELIMITER: &str = "___";

/// Room every client joins on connect and the fallback for room messages without a room
pub const DEFAULT_ROOM: &str = "General";

/// Reasons a string cannot be used as a conversation key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Room name is empty or whitespace
    #[error("conversation key is empty")]
    Empty,

    /// Room name collides with the direct conversation key space
    #[error("room name '{name}' uses the reserved prefix '{DIRECT_PREFIX}'")]
    ReservedPrefix {
        /// Offending room name
        name: String,
    },

    /// A `dm_` key that does not contain two participant ids
    #[error("malformed direct conversation key '{raw}'")]
    MalformedDirect {
        /// Offending key
        raw: String,
    },
}

impl From<KeyError> for murmur_core::MurmurError {
    fn from(err: KeyError) -> Self {
        murmur_core::MurmurError::invalid(err.to_string())
    }
}

/// Canonical identifier of one conversation (room or direct)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConversationKey(String);

impl ConversationKey {
    /// Key for a room. Rejects empty names and names in the reserved direct key space.
    pub fn room(name: &str) -> Result<Self, KeyError> {
        if name.trim().is_empty() {
            return Err(KeyError::Empty);
        }
        if name.starts_with(DIRECT_PREFIX) {
            return Err(KeyError::ReservedPrefix {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Key of [`DEFAULT_ROOM`]
    pub fn default_room() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }

    /// Key for the direct conversation between `a` and `b`, in either order.
    ///
    /// Returns `None` when either id is blank, contains [`DIRECT_DELIMITER`],
    /// or would make the key split back into a different pair (an id ending or
    /// starting with `_` next to the delimiter). Every key therefore names
    /// exactly one pair.
    pub fn direct(a: &UserId, b: &UserId) -> Option<Self> {
        if a.is_empty() || b.is_empty() {
            return None;
        }
        if a.as_str().contains(DIRECT_DELIMITER) || b.as_str().contains(DIRECT_DELIMITER) {
            return None;
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let key = Self(format!("{DIRECT_PREFIX}{lo}{DIRECT_DELIMITER}{hi}"));
        match key.participants() {
            Some((first, second)) if &first == lo && &second == hi => Some(key),
            _ => None,
        }
    }

    /// Parse a key received from elsewhere (transport `dmKey`, persisted UI state).
    ///
    /// Direct keys are re-derived so a key with its participants in the wrong
    /// order still lands on the canonical form.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        match raw.strip_prefix(DIRECT_PREFIX) {
            Some(rest) => {
                let (a, b) = rest
                    .split_once(DIRECT_DELIMITER)
                    .ok_or_else(|| KeyError::MalformedDirect {
                        raw: raw.to_string(),
                    })?;
                Self::direct(&UserId::from(a), &UserId::from(b)).ok_or_else(|| {
                    KeyError::MalformedDirect {
                        raw: raw.to_string(),
                    }
                })
            }
            None => Self::room(raw),
        }
    }

    /// The key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key names a direct conversation
    pub fn is_direct(&self) -> bool {
        self.0.starts_with(DIRECT_PREFIX)
    }

    /// Room name, for room keys
    pub fn room_name(&self) -> Option<&str> {
        (!self.is_direct()).then_some(self.0.as_str())
    }

    /// Both participants of a direct key, in key order
    pub fn participants(&self) -> Option<(UserId, UserId)> {
        let rest = self.0.strip_prefix(DIRECT_PREFIX)?;
        let (a, b) = rest.split_once(DIRECT_DELIMITER)?;
        Some((UserId::from(a), UserId::from(b)))
    }

    /// The participant that is not `self_id`, for direct keys that include `self_id`
    pub fn other_participant(&self, self_id: &UserId) -> Option<UserId> {
        let rest = self.0.strip_prefix(DIRECT_PREFIX)?;
        let me = self_id.as_str();
        if let Some(other) = rest
            .strip_prefix(me)
            .and_then(|r| r.strip_prefix(DIRECT_DELIMITER))
        {
            return Some(UserId::from(other));
        }
        rest.strip_suffix(me)
            .and_then(|r| r.strip_suffix(DIRECT_DELIMITER))
            .map(UserId::from)
    }
}

/// Direct key for two optional ids; `None` if either is absent or blank.
pub fn derive_direct_key(a: Option<&UserId>, b: Option<&UserId>) -> Option<ConversationKey> {
    ConversationKey::direct(a?, b?)
}

/// Room names safe to show in a room list. Reserved-prefix and blank names are dropped.
pub fn visible_rooms<'a, I>(rooms: I) -> Vec<ConversationKey>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<ConversationKey> = Vec::new();
    for name in rooms {
        match ConversationKey::room(name) {
            Ok(key) if !out.contains(&key) => out.push(key),
            Ok(_) => {}
            Err(err) => tracing::trace!(room = name, error = %err, "hiding room from room list"),
        }
    }
    out
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ConversationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConversationKey {
    type Error = KeyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ConversationKey> for String {
    fn from(key: ConversationKey) -> Self {
        key.0
    }
}
