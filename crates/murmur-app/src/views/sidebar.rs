//! Sidebar view: rooms and direct conversations with unread badges

use crate::directory::UserDirectory;
use murmur_chat::{ConversationKey, UnreadTracker};
use murmur_core::UserId;
use serde::Serialize;

/// A room row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEntry {
    /// Room key
    pub key: ConversationKey,
    /// Unread badge
    pub unread: u32,
    /// Whether this is the active conversation
    pub active: bool,
}

/// A direct conversation row, one per other known user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectEntry {
    /// The other user
    pub user_id: UserId,
    /// Their display name
    pub username: String,
    /// Their avatar
    pub avatar: Option<String>,
    /// Presence flag
    pub online: bool,
    /// Key of the conversation with them
    pub key: ConversationKey,
    /// Unread badge
    pub unread: u32,
    /// Whether this is the active conversation
    pub active: bool,
}

/// Everything the sidebar lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    /// Rooms, reserved names already removed
    pub rooms: Vec<RoomEntry>,
    /// Direct conversations
    pub direct: Vec<DirectEntry>,
    /// Users reported online
    pub online: usize,
    /// Unread messages across all conversations
    pub total_unread: u32,
}

impl SidebarView {
    /// Build the sidebar.
    ///
    /// Direct rows need the local user's id to derive keys; before connecting
    /// there are none.
    pub fn build(
        rooms: &[ConversationKey],
        directory: &UserDirectory,
        unread: &UnreadTracker,
        self_id: Option<&UserId>,
        active: Option<&ConversationKey>,
    ) -> Self {
        let rooms = rooms
            .iter()
            .filter(|key| !key.is_direct())
            .map(|key| RoomEntry {
                key: key.clone(),
                unread: unread.get(key),
                active: active == Some(key),
            })
            .collect();

        let direct = match self_id {
            Some(me) => directory
                .iter()
                .filter(|user| &user.id != me)
                .filter_map(|user| {
                    let key = ConversationKey::direct(me, &user.id)?;
                    Some(DirectEntry {
                        user_id: user.id.clone(),
                        username: user.username.clone(),
                        avatar: user.avatar.clone(),
                        online: user.online,
                        unread: unread.get(&key),
                        active: active == Some(&key),
                        key,
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            rooms,
            direct,
            online: directory.online_count(),
            total_unread: unread.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_chat::{visible_rooms, Participant};

    fn participant(id: &str, name: &str) -> Participant {
        Participant {
            id: UserId::from(id),
            username: name.into(),
            avatar: None,
            online: true,
        }
    }

    #[test]
    fn test_sidebar_lists_rooms_and_partners() {
        let rooms = visible_rooms(["General", "dm_u1___u2", "Random"]);
        let mut directory = UserDirectory::new();
        directory.replace(vec![participant("u1", "Me"), participant("u2", "Bob")]);
        let mut unread = UnreadTracker::new();
        let me = UserId::from("u1");
        let dm = ConversationKey::direct(&me, &UserId::from("u2")).unwrap();
        unread.on_message_arrived(&dm, false, false);

        let general = ConversationKey::default_room();
        let sidebar = SidebarView::build(&rooms, &directory, &unread, Some(&me), Some(&general));

        let names: Vec<&str> = sidebar.rooms.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(names, vec!["General", "Random"]);
        assert!(sidebar.rooms[0].active);
        assert_eq!(sidebar.direct.len(), 1);
        assert_eq!(sidebar.direct[0].username, "Bob");
        assert_eq!(sidebar.direct[0].key.as_str(), "dm_u1___u2");
        assert_eq!(sidebar.direct[0].unread, 1);
        assert_eq!(sidebar.total_unread, 1);
        assert_eq!(sidebar.online, 2);
    }

    #[test]
    fn test_no_direct_rows_before_connect() {
        let mut directory = UserDirectory::new();
        directory.replace(vec![participant("u2", "Bob")]);
        let sidebar = SidebarView::build(&[], &directory, &UnreadTracker::new(), None, None);
        assert!(sidebar.direct.is_empty());
    }
}
