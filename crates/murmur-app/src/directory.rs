//! Presence directory
//!
//! The transport periodically pushes the full list of connected users. The
//! directory keeps the latest list, in server order, for DM labels, avatars
//! and the sidebar.

use indexmap::IndexMap;
use murmur_chat::Participant;
use murmur_core::UserId;

/// Latest known presence list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: IndexMap<UserId, Participant>,
}

impl UserDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the directory with a fresh presence list. Later duplicates win.
    pub fn replace(&mut self, users: Vec<Participant>) {
        self.users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        tracing::trace!(count = self.users.len(), "presence list updated");
    }

    /// Look a user up
    pub fn get(&self, id: &UserId) -> Option<&Participant> {
        self.users.get(id)
    }

    /// Display name of a user, if known
    pub fn username(&self, id: &UserId) -> Option<&str> {
        self.get(id).map(|u| u.username.as_str())
    }

    /// Avatar URL of a user, if known
    pub fn avatar(&self, id: &UserId) -> Option<&str> {
        self.get(id).and_then(|u| u.avatar.as_deref())
    }

    /// Users in server order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.users.values()
    }

    /// Number of known users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no user is known
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of users flagged online
    pub fn online_count(&self) -> usize {
        self.users.values().filter(|u| u.online).count()
    }

    /// Forget everyone
    pub fn clear(&mut self) {
        self.users.clear();
    }
}
