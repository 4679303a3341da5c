//! # Message Ingestion and Grouping
//!
//! The [`EventLog`] is the append-only source of truth for a session: every
//! raw record the transport delivered, the messages that validated, and the
//! records that did not. Nothing is ever removed from it.
//!
//! Conversation groups are a pure projection of the log ([`group`]) and are
//! recomputed on demand. Deduplication and reconciliation of local echoes with
//! their server confirmations happen there, so ingesting the same event twice
//! never changes what a user sees.

use crate::events::{MessageRecord, ReactionToggle, ReadReceipt, RecordError};
use crate::key::{derive_direct_key, ConversationKey, KeyError};
use crate::message::{Message, MessageIdentity};
use indexmap::IndexMap;
use murmur_core::{MessageId, TempId};
use std::collections::HashMap;

/// Messages of every routable conversation, keyed in order of first appearance
pub type ConversationGroups<'a> = IndexMap<ConversationKey, Vec<&'a Message>>;

// ============================================================================
// Event log
// ============================================================================

/// A validated message with its position in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedMessage {
    /// Monotonic ingestion sequence number
    pub seq: u64,
    /// The message
    pub message: Message,
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// What was received
    pub record: MessageRecord,
    /// Why it was rejected
    pub error: RecordError,
}

/// Append-only log of everything ingested this session
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<MessageRecord>,
    messages: Vec<LoggedMessage>,
    rejected: Vec<RejectedRecord>,
    next_seq: u64,
}

impl EventLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transport message and, if it validates, append it.
    ///
    /// The raw record is always kept. Invalid records land in
    /// [`EventLog::rejected`] and do not affect later ingestion.
    pub fn ingest(&mut self, record: MessageRecord) -> Result<&Message, RecordError> {
        self.records.push(record.clone());
        match record.clone().into_message() {
            Ok(message) => Ok(self.push(message)),
            Err(error) => {
                tracing::debug!(
                    error = %error,
                    id = ?record.id,
                    temp_id = ?record.temp_id,
                    "rejected message record"
                );
                self.rejected.push(RejectedRecord {
                    record,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Append an already-validated message, e.g. a local echo
    pub fn push(&mut self, message: Message) -> &Message {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages.push(LoggedMessage { seq, message });
        let last = self.messages.len() - 1;
        &self.messages[last].message
    }

    /// Toggle a reaction on every logged copy of the target message.
    ///
    /// Returns how many copies were touched.
    pub fn apply_reaction(&mut self, toggle: &ReactionToggle) -> usize {
        let mut touched = 0;
        for entry in self
            .messages
            .iter_mut()
            .filter(|e| e.message.identity.answers_to(&toggle.message_id))
        {
            entry.message.toggle_reaction(&toggle.emoji, &toggle.user_id);
            touched += 1;
        }
        if touched == 0 {
            tracing::trace!(message_id = %toggle.message_id, "reaction for unknown message");
        }
        touched
    }

    /// Mark the target message as read by the receipt's reader.
    ///
    /// Returns how many copies were touched.
    pub fn apply_read_receipt(&mut self, receipt: &ReadReceipt) -> usize {
        let mut touched = 0;
        for entry in self
            .messages
            .iter_mut()
            .filter(|e| e.message.identity.answers_to(&receipt.message_id))
        {
            entry.message.mark_read_by(receipt.user_id.clone());
            touched += 1;
        }
        if touched == 0 {
            tracing::trace!(message_id = %receipt.message_id, "read receipt for unknown message");
        }
        touched
    }

    /// Validated messages in ingestion order
    pub fn messages(&self) -> &[LoggedMessage] {
        &self.messages
    }

    /// Every raw record received, valid or not
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Records that failed validation
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    /// Number of validated messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message validated yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// ============================================================================
// Routing
// ============================================================================

/// Maps a message to the key of the conversation it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationKeyResolver {
    default_room: ConversationKey,
}

impl Default for ConversationKeyResolver {
    fn default() -> Self {
        Self {
            default_room: ConversationKey::default_room(),
        }
    }
}

impl ConversationKeyResolver {
    /// Resolver that sends room messages without a room to `default_room`
    pub fn new(default_room: &str) -> Result<Self, KeyError> {
        Ok(Self {
            default_room: ConversationKey::room(default_room)?,
        })
    }

    /// Fallback room key
    pub fn default_room(&self) -> &ConversationKey {
        &self.default_room
    }

    /// Key of the conversation `message` belongs to, or `None` if unroutable.
    ///
    /// Direct messages prefer the transport's `dmKey` and otherwise derive one
    /// from sender and receiver. Room messages use their room, or the default
    /// room when none is set. A room name in the reserved direct key space is
    /// unroutable.
    pub fn resolve(&self, message: &Message) -> Option<ConversationKey> {
        if message.is_direct {
            return message.dm_key.clone().or_else(|| {
                derive_direct_key(Some(&message.sender_id), message.receiver_id.as_ref())
            });
        }
        match message.room.as_deref() {
            Some(room) => ConversationKey::room(room).ok(),
            None => Some(self.default_room.clone()),
        }
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Counters from one grouping pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Messages placed in a group
    pub grouped: usize,
    /// Messages dropped as duplicates of one already grouped
    pub duplicates: usize,
    /// Provisional messages replaced by their confirmation
    pub reconciled: usize,
    /// Messages with no resolvable key
    pub unroutable: usize,
}

/// Group the log by conversation. See [`group_with_stats`].
pub fn group<'a>(log: &'a EventLog, resolver: &ConversationKeyResolver) -> ConversationGroups<'a> {
    group_with_stats(log, resolver).0
}

/// Identity lookups for the messages already placed in one group.
///
/// Positions are the first slot holding the id. A temp id appears in
/// `pending` only while its slot is still unconfirmed.
#[derive(Debug, Default)]
struct SlotIndex {
    by_id: HashMap<MessageId, usize>,
    by_temp: HashMap<TempId, usize>,
    pending: HashMap<TempId, usize>,
}

impl SlotIndex {
    /// First slot whose message is the same as `identity`
    fn find(&self, identity: &MessageIdentity) -> Option<usize> {
        match (&identity.id, &identity.temp_id) {
            (Some(id), temp) => {
                let by_id = self.by_id.get(id).copied();
                let by_temp = temp.as_ref().and_then(|t| self.pending.get(t).copied());
                by_id.into_iter().chain(by_temp).min()
            }
            (None, Some(temp)) => self.by_temp.get(temp).copied(),
            (None, None) => None,
        }
    }

    fn remember(&mut self, pos: usize, identity: &MessageIdentity) {
        if let Some(id) = &identity.id {
            keep_first(&mut self.by_id, id.clone(), pos);
        }
        if let Some(temp) = &identity.temp_id {
            keep_first(&mut self.by_temp, temp.clone(), pos);
            if identity.is_confirmed() {
                if self.pending.get(temp) == Some(&pos) {
                    self.pending.remove(temp);
                }
            } else {
                keep_first(&mut self.pending, temp.clone(), pos);
            }
        }
    }
}

fn keep_first<K: std::hash::Hash + Eq>(map: &mut HashMap<K, usize>, key: K, pos: usize) {
    map.entry(key)
        .and_modify(|existing| *existing = (*existing).min(pos))
        .or_insert(pos);
}

/// Group the log by conversation, deduplicating within each conversation.
///
/// A message matching one already in its group is a duplicate, unless it
/// carries a confirmed id the grouped one lacks; then it takes over the
/// grouped message's slot. Matching is by hashed id lookup, so a pass is
/// linear in the size of the log.
pub fn group_with_stats<'a>(
    log: &'a EventLog,
    resolver: &ConversationKeyResolver,
) -> (ConversationGroups<'a>, GroupingStats) {
    let mut groups = ConversationGroups::new();
    let mut indexes: HashMap<ConversationKey, SlotIndex> = HashMap::new();
    let mut stats = GroupingStats::default();

    for entry in log.messages() {
        let message = &entry.message;
        let Some(key) = resolver.resolve(message) else {
            tracing::debug!(
                seq = entry.seq,
                sender = %message.sender_id,
                direct = message.is_direct,
                "unroutable message kept in log only"
            );
            stats.unroutable += 1;
            continue;
        };

        let index = indexes.entry(key.clone()).or_default();
        let slot = groups.entry(key).or_default();
        match index.find(&message.identity) {
            Some(pos) => {
                if !slot[pos].identity.is_confirmed() && message.identity.is_confirmed() {
                    tracing::trace!(seq = entry.seq, "local echo reconciled with confirmation");
                    slot[pos] = message;
                    index.remember(pos, &message.identity);
                    stats.reconciled += 1;
                } else {
                    stats.duplicates += 1;
                }
            }
            None => {
                index.remember(slot.len(), &message.identity);
                slot.push(message);
                stats.grouped += 1;
            }
        }
    }

    (groups, stats)
}
