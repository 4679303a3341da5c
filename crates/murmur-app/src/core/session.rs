//! # Chat Session
//!
//! Owns everything one signed-in client knows: the event log, unread counts,
//! filter state, the active conversation, presence and typing indicators.
//!
//! The session is synchronous. Operations that need the server return
//! [`TransportCommand`]s instead of performing I/O; the workflows dispatch
//! them over a [`ChatTransport`](crate::transport::ChatTransport).

use super::reducer::{reduce_view, ViewDelta};
use crate::config::AppConfig;
use crate::directory::UserDirectory;
use crate::errors::AppError;
use crate::transport::{FileDescriptor, TransportCommand, UploadedFile};
use crate::views::{ConversationView, SidebarView};
use murmur_chat::{
    group, visible_rooms, ChatEvent, ConversationKey, ConversationKeyResolver, EventLog,
    FilterState, Message, MessageContent, MessageIdentity, MessageRecord, ReactionToggle,
    ReadReceipt, TypingNotice, UnreadTracker,
};
use murmur_core::{MurmurError, TempId, Timestamp, UserId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// Activation
// ============================================================================

/// Where the session stands with respect to the displayed conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationState {
    /// Nothing displayed; remembers the last conversation for reconnects
    Inactive(Option<ConversationKey>),
    /// Selected; join and read receipts not yet confirmed sent
    Activating(ConversationKey),
    /// Selected and its commands dispatched
    Active(ConversationKey),
}

impl Default for ActivationState {
    fn default() -> Self {
        Self::Inactive(None)
    }
}

impl ActivationState {
    /// The conversation the user is looking at, if any
    #[must_use]
    pub fn active_key(&self) -> Option<&ConversationKey> {
        match self {
            Self::Inactive(_) => None,
            Self::Activating(key) | Self::Active(key) => Some(key),
        }
    }

    /// Whether activation of the current conversation has completed
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Activating(_))
    }
}

/// Result of selecting a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Conversation selected
    pub key: ConversationKey,
    /// Header label: room name, DM partner username, or `DM`
    pub label: String,
    /// DM partner avatar
    pub avatar: Option<String>,
    /// Join and read receipt commands to dispatch
    pub commands: Vec<TransportCommand>,
}

/// Result of handling one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    /// What changed
    pub delta: ViewDelta,
    /// Commands the event triggered (read receipts for the open conversation)
    pub commands: Vec<TransportCommand>,
}

impl EventOutcome {
    fn delta(delta: ViewDelta) -> Self {
        Self {
            delta,
            commands: Vec::new(),
        }
    }
}

/// Where an outbound message goes
enum Route {
    Room(String),
    Direct(UserId),
}

// ============================================================================
// Session
// ============================================================================

/// State of one client session
#[derive(Debug, Clone)]
pub struct ChatSession {
    self_id: Option<UserId>,
    resolver: ConversationKeyResolver,
    auto_join_default_room: bool,
    log: EventLog,
    unread: UnreadTracker,
    filter: FilterState,
    activation: ActivationState,
    joined_rooms: BTreeSet<ConversationKey>,
    directory: UserDirectory,
    rooms: Vec<ConversationKey>,
    typing: HashMap<ConversationKey, BTreeMap<UserId, String>>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ConversationKeyResolver::default())
    }
}

impl ChatSession {
    /// Create a session routing room-less messages through `resolver`
    pub fn new(resolver: ConversationKeyResolver) -> Self {
        Self {
            self_id: None,
            resolver,
            auto_join_default_room: true,
            log: EventLog::new(),
            unread: UnreadTracker::new(),
            filter: FilterState::new(),
            activation: ActivationState::default(),
            joined_rooms: BTreeSet::new(),
            directory: UserDirectory::new(),
            rooms: Vec::new(),
            typing: HashMap::new(),
        }
    }

    /// Create a session from validated configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let mut session = Self::new(config.resolver()?);
        session.auto_join_default_room = config.auto_join_default_room;
        Ok(session)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Sign in as `self_id`.
    ///
    /// Reopens the conversation shown before the last disconnect, otherwise
    /// the default room when auto-join is enabled. Returns the commands that
    /// activation produced.
    pub fn connect(&mut self, self_id: UserId) -> Vec<TransportCommand> {
        tracing::debug!(user = %self_id, "session connected");
        self.self_id = Some(self_id);

        let target = match &self.activation {
            ActivationState::Inactive(Some(previous)) => Some(previous.clone()),
            ActivationState::Inactive(None) if self.auto_join_default_room => {
                Some(self.resolver.default_room().clone())
            }
            ActivationState::Inactive(None) => None,
            ActivationState::Activating(key) | ActivationState::Active(key) => Some(key.clone()),
        };
        target
            .map(|key| self.activate(&key).commands)
            .unwrap_or_default()
    }

    /// Sign out or lose the connection.
    ///
    /// Unread counts, filter, room joins and typing indicators are
    /// per-connection and cleared. The log is kept for the process lifetime.
    pub fn disconnect(&mut self) {
        let previous = self.activation.active_key().cloned();
        tracing::debug!(
            previous = ?previous.as_ref().map(ConversationKey::as_str),
            "session disconnected"
        );
        self.self_id = None;
        self.unread.reset();
        self.filter.reset();
        self.joined_rooms.clear();
        self.typing.clear();
        self.activation = ActivationState::Inactive(previous);
    }

    // ------------------------------------------------------------------------
    // Inbound events
    // ------------------------------------------------------------------------

    /// Apply one event from the transport
    pub fn handle_event(&mut self, event: ChatEvent) -> EventOutcome {
        tracing::trace!(event = event.name(), "handling chat event");
        match event {
            ChatEvent::Message(record) => self.on_message(record),
            ChatEvent::ReactionToggle(toggle) => self.on_reaction(toggle),
            ChatEvent::ReadReceipt(receipt) => self.on_read_receipt(receipt),
            ChatEvent::Users { users } => {
                self.directory.replace(users);
                EventOutcome::delta(ViewDelta::PresenceUpdated {
                    users: self.directory.len(),
                })
            }
            ChatEvent::Rooms { rooms } => {
                self.rooms = visible_rooms(rooms.iter().map(String::as_str));
                EventOutcome::delta(ViewDelta::RoomsUpdated {
                    visible: self.rooms.len(),
                })
            }
            ChatEvent::Typing(notice) => self.on_typing(notice),
        }
    }

    fn on_message(&mut self, record: MessageRecord) -> EventOutcome {
        let message = match self.log.ingest(record) {
            Ok(message) => message.clone(),
            Err(error) => return EventOutcome::delta(ViewDelta::MessageRejected { error }),
        };
        let Some(key) = self.resolver.resolve(&message) else {
            tracing::debug!(
                id = ?message.identity.id,
                sender = %message.sender_id,
                "message has no routable conversation"
            );
            return EventOutcome::delta(ViewDelta::MessageUnroutable);
        };

        if let Some(names) = self.typing.get_mut(&key) {
            names.remove(&message.sender_id);
        }

        let earlier = &self.log.messages()[..self.log.len().saturating_sub(1)];
        let seen_before = earlier.iter().any(|entry| {
            entry.message.identity.same_message(&message.identity)
                && self.resolver.resolve(&entry.message).as_ref() == Some(&key)
        });
        if seen_before {
            tracing::trace!(
                key = %key,
                render_key = message.identity.render_key(),
                "merged message"
            );
            return EventOutcome::delta(ViewDelta::MessageMerged { key });
        }

        let is_from_self = self.self_id.as_ref().is_some_and(|me| message.is_from(me));
        let is_active = self.activation.active_key() == Some(&key);
        let unread = self.unread.on_message_arrived(&key, is_from_self, is_active);

        let mut commands = Vec::new();
        if let (Some(me), Some(id), true) = (&self.self_id, &message.identity.id, is_active) {
            if !is_from_self && !message.is_read_by(me) {
                commands.push(TransportCommand::SendReadReceipt {
                    message_id: id.clone(),
                });
            }
        }

        EventOutcome {
            delta: ViewDelta::MessageAdded { key, unread },
            commands,
        }
    }

    fn on_reaction(&mut self, toggle: ReactionToggle) -> EventOutcome {
        let touched = self.log.apply_reaction(&toggle);
        EventOutcome::delta(ViewDelta::ReactionToggled {
            message_id: toggle.message_id,
            touched,
        })
    }

    fn on_read_receipt(&mut self, receipt: ReadReceipt) -> EventOutcome {
        let touched = self.log.apply_read_receipt(&receipt);

        if let Some(me) = self.self_id.as_ref().filter(|me| **me == receipt.user_id) {
            let key = self
                .log
                .messages()
                .iter()
                .find(|entry| entry.message.identity.answers_to(&receipt.message_id))
                .and_then(|entry| self.resolver.resolve(&entry.message));
            if let Some(key) = key {
                let groups = group(&self.log, &self.resolver);
                if let Some(messages) = groups.get(&key) {
                    if self.unread.close_if_read(&key, messages.iter().copied(), me) {
                        tracing::trace!(key = %key, "conversation read elsewhere");
                    }
                }
            }
        }

        EventOutcome::delta(ViewDelta::ReadReceiptApplied {
            message_id: receipt.message_id,
            touched,
        })
    }

    fn on_typing(&mut self, notice: TypingNotice) -> EventOutcome {
        if self.self_id.as_ref() == Some(&notice.user_id) {
            return EventOutcome::delta(ViewDelta::Ignored);
        }
        let key = match ConversationKey::parse(&notice.conversation_key) {
            Ok(key) => key,
            Err(error) => {
                tracing::trace!(
                    error = %error,
                    raw = %notice.conversation_key,
                    "typing notice for bad key"
                );
                return EventOutcome::delta(ViewDelta::Ignored);
            }
        };

        let names = self.typing.entry(key.clone()).or_default();
        let changed = if notice.is_typing {
            names.insert(notice.user_id, notice.username).is_none()
        } else {
            names.remove(&notice.user_id).is_some()
        };
        if names.is_empty() {
            self.typing.remove(&key);
        }

        if changed {
            EventOutcome::delta(ViewDelta::TypingChanged { key })
        } else {
            EventOutcome::delta(ViewDelta::Ignored)
        }
    }

    // ------------------------------------------------------------------------
    // Conversation selection
    // ------------------------------------------------------------------------

    /// Select a conversation.
    ///
    /// Safe to repeat: rooms are joined once per connection, unread is
    /// cleared, and a read receipt is produced for every confirmed message
    /// from someone else that the local user has not read yet.
    pub fn activate(&mut self, key: &ConversationKey) -> Activation {
        self.activation = ActivationState::Activating(key.clone());
        let (label, avatar) = self.label_for(key);

        let mut commands = Vec::new();
        if let Some(room) = key.room_name() {
            if self.joined_rooms.insert(key.clone()) {
                commands.push(TransportCommand::JoinRoom {
                    room: room.to_string(),
                });
            }
        }

        self.unread.clear(key);

        if let Some(me) = &self.self_id {
            let groups = group(&self.log, &self.resolver);
            if let Some(messages) = groups.get(key) {
                commands.extend(
                    messages
                        .iter()
                        .filter(|m| !m.is_from(me) && !m.is_read_by(me))
                        .filter_map(|m| m.identity.id.clone())
                        .map(|message_id| TransportCommand::SendReadReceipt { message_id }),
                );
            }
        }

        tracing::debug!(key = %key, commands = commands.len(), "activating conversation");
        Activation {
            key: key.clone(),
            label,
            avatar,
            commands,
        }
    }

    /// Mark activation of `key` complete. False if another conversation was
    /// selected in the meantime.
    pub fn complete_activation(&mut self, key: &ConversationKey) -> bool {
        match &self.activation {
            ActivationState::Activating(current) if current == key => {
                self.activation = ActivationState::Active(key.clone());
                true
            }
            _ => false,
        }
    }

    /// Forget that a room was joined so the next activation retries the join
    pub fn forget_join(&mut self, key: &ConversationKey) {
        self.joined_rooms.remove(key);
    }

    /// Close the displayed conversation
    pub fn deactivate(&mut self) {
        self.activation = ActivationState::Inactive(self.activation.active_key().cloned());
    }

    fn label_for(&self, key: &ConversationKey) -> (String, Option<String>) {
        if let Some(room) = key.room_name() {
            return (room.to_string(), None);
        }
        let partner = self
            .self_id
            .as_ref()
            .and_then(|me| key.other_participant(me))
            .and_then(|id| self.directory.get(&id).cloned());
        match partner {
            Some(user) => (user.username, user.avatar),
            None => ("DM".to_string(), None),
        }
    }

    // ------------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------------

    /// Conversation an outbound message would go to
    pub fn send_target(&self) -> Result<ConversationKey, AppError> {
        if self.self_id.is_none() {
            return Err(AppError::user_action("Send message", "connect first"));
        }
        self.activation
            .active_key()
            .cloned()
            .ok_or_else(|| AppError::user_action("Send message", "select a conversation first"))
    }

    fn sender(&self) -> Result<UserId, AppError> {
        self.self_id
            .clone()
            .ok_or_else(|| AppError::user_action("Send message", "connect first"))
    }

    fn route(key: &ConversationKey, me: &UserId) -> Result<Route, AppError> {
        if let Some(room) = key.room_name() {
            return Ok(Route::Room(room.to_string()));
        }
        key.other_participant(me).map(Route::Direct).ok_or_else(|| {
            AppError::user_action("Send message", "this direct conversation is not yours")
        })
    }

    /// Append the local echo of an outbound message
    fn push_echo(
        &mut self,
        key: &ConversationKey,
        me: &UserId,
        route: &Route,
        content: MessageContent,
        temp_id: TempId,
    ) {
        let sender_name = self
            .directory
            .username(me)
            .map_or_else(|| me.as_str().to_string(), str::to_string);
        let (room, receiver_id, dm_key) = match route {
            Route::Room(room) => (Some(room.clone()), None, None),
            Route::Direct(to) => (None, Some(to.clone()), Some(key.clone())),
        };
        let echo = Message {
            identity: MessageIdentity::provisional(temp_id),
            sender_id: me.clone(),
            sender_name,
            room,
            receiver_id,
            is_direct: dm_key.is_some(),
            dm_key,
            content,
            timestamp: Timestamp::now(),
            read_by: BTreeSet::new(),
            reactions: BTreeMap::new(),
            delivered: false,
        };
        tracing::trace!(key = %key, temp_id = echo.identity.render_key(), "local echo");
        self.log.push(echo);
    }

    /// Compose a text message for the active conversation.
    ///
    /// The text is trimmed; whitespace-only input yields `Ok(None)`. A local
    /// echo is logged immediately and reconciled when the server confirms it.
    pub fn compose_text(&mut self, text: &str) -> Result<Option<TransportCommand>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let key = self.send_target()?;
        let me = self.sender()?;
        let route = Self::route(&key, &me)?;
        let temp_id = TempId::generate();
        self.push_echo(
            &key,
            &me,
            &route,
            MessageContent::Text {
                body: text.to_string(),
            },
            temp_id.clone(),
        );

        let text = text.to_string();
        Ok(Some(match route {
            Route::Room(room) => TransportCommand::SendMessage {
                text,
                room,
                temp_id,
            },
            Route::Direct(to) => TransportCommand::SendPrivateMessage { to, text, temp_id },
        }))
    }

    /// Compose the share of an uploaded file to `key`.
    ///
    /// `key` is captured before the upload started, so switching
    /// conversations mid-upload does not redirect the file.
    pub fn compose_file(
        &mut self,
        key: &ConversationKey,
        uploaded: UploadedFile,
        file_name: &str,
    ) -> Result<TransportCommand, AppError> {
        let me = self.sender()?;
        let route = Self::route(key, &me)?;
        let temp_id = TempId::generate();
        self.push_echo(
            key,
            &me,
            &route,
            MessageContent::File {
                url: uploaded.url.clone(),
                file_name: Some(file_name.to_string()).filter(|f| !f.trim().is_empty()),
            },
            temp_id.clone(),
        );

        let (is_private, room, receiver_id) = match route {
            Route::Room(room) => (false, Some(room), None),
            Route::Direct(to) => (true, None, Some(to)),
        };
        Ok(TransportCommand::SendFile(FileDescriptor {
            is_private,
            room,
            receiver_id,
            url: uploaded.url,
            file_name: file_name.to_string(),
            temp_id,
        }))
    }

    /// Toggle `emoji` on a message, referenced by confirmed or temp id.
    ///
    /// The server only knows confirmed ids, so reacting to a message that is
    /// still a local echo is refused.
    pub fn toggle_reaction(
        &self,
        message_ref: &str,
        emoji: &str,
    ) -> Result<TransportCommand, AppError> {
        let mut copies = self
            .log
            .messages()
            .iter()
            .filter(|entry| entry.message.identity.answers_to(message_ref))
            .peekable();
        if copies.peek().is_none() {
            return Err(MurmurError::not_found(format!("message {message_ref}")).into());
        }
        let message_id = copies
            .find_map(|entry| entry.message.identity.id.clone())
            .ok_or_else(|| {
                AppError::user_action("React to message", "wait until it is delivered")
            })?;
        Ok(TransportCommand::SendReaction {
            message_id,
            emoji: emoji.to_string(),
        })
    }

    /// Typing indicator for the active conversation
    pub fn set_typing(&self, is_typing: bool) -> Option<TransportCommand> {
        self.activation
            .active_key()
            .map(|key| TransportCommand::SetTyping {
                is_typing,
                key: key.clone(),
            })
    }

    // ------------------------------------------------------------------------
    // Accessors and views
    // ------------------------------------------------------------------------

    /// Local user, once connected
    #[must_use]
    pub fn self_id(&self) -> Option<&UserId> {
        self.self_id.as_ref()
    }

    /// Activation state
    #[must_use]
    pub fn activation(&self) -> &ActivationState {
        &self.activation
    }

    /// Event log
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Unread counts
    #[must_use]
    pub fn unread(&self) -> &UnreadTracker {
        &self.unread
    }

    /// Presence directory
    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Visible rooms from the last room list
    #[must_use]
    pub fn rooms(&self) -> &[ConversationKey] {
        &self.rooms
    }

    /// Key resolver
    #[must_use]
    pub fn resolver(&self) -> &ConversationKeyResolver {
        &self.resolver
    }

    /// Current filter
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Mutable filter, for incremental edits
    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Replace the filter
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Display names of users typing in `key`
    #[must_use]
    pub fn typing_in(&self, key: &ConversationKey) -> Vec<String> {
        self.typing
            .get(key)
            .map(|names| names.values().cloned().collect())
            .unwrap_or_default()
    }

    /// View of the active conversation
    #[must_use]
    pub fn view(&self) -> Option<ConversationView> {
        self.activation.active_key().map(|key| self.view_of(key))
    }

    /// View of any conversation under the current filter
    #[must_use]
    pub fn view_of(&self, key: &ConversationKey) -> ConversationView {
        let messages = reduce_view(&self.log, &self.resolver, &self.filter, key);
        let (label, avatar) = self.label_for(key);
        let mut view = ConversationView::new(
            key.clone(),
            label,
            avatar,
            &messages,
            &self.filter.query,
            self.self_id.as_ref(),
            &self.directory,
        );
        view.typing = self.typing_in(key);
        view
    }

    /// Sidebar listing
    #[must_use]
    pub fn sidebar(&self) -> SidebarView {
        SidebarView::build(
            &self.rooms,
            &self.directory,
            &self.unread,
            self.self_id.as_ref(),
            self.activation.active_key(),
        )
    }
}
