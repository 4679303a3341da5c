//! End-to-end scenarios over the chat pipeline

#![allow(clippy::unwrap_used)]

use murmur_chat::{
    group, highlight, search, sorted_chronological, visible_rooms, ConversationKey,
    ConversationKeyResolver, EventLog, FilterMode, FilterState, UnreadTracker,
};
use murmur_core::UserId;
use murmur_testkit::{init_test_tracing, RecordBuilder};

#[test]
fn test_files_filter_with_hi_query() {
    init_test_tracing();
    let mut log = EventLog::new();
    log.ingest(RecordBuilder::text("m1", "u1", "hi all").record()).unwrap();
    log.ingest(
        RecordBuilder::file("m2", "u2", "https://files.test/hi-res.png", "hi-res.png")
            .at("2024-05-01T09:00:00Z")
            .record(),
    )
    .unwrap();
    log.ingest(
        RecordBuilder::file("m3", "u2", "https://files.test/notes.txt", "notes.txt").record(),
    )
    .unwrap();

    let groups = group(&log, &ConversationKeyResolver::default());
    let general = &groups["General"];
    let state = FilterState::new().with_mode(FilterMode::Files).with_query("hi");
    let filtered = state.apply(general.iter().copied());
    let view = sorted_chronological(search(filtered, &state.query));

    assert_eq!(view.len(), 1);
    assert_eq!(view[0].file_name(), Some("hi-res.png"));
    assert_eq!(
        highlight(view[0].file_name().unwrap(), &state.query),
        "<mark>hi</mark>-res.png"
    );
}

#[test]
fn test_dm_between_u1_and_u2_lands_in_one_conversation() {
    let mut log = EventLog::new();
    log.ingest(RecordBuilder::text("m1", "u1", "ping").direct_to("u2").record()).unwrap();
    log.ingest(
        RecordBuilder::text("m2", "u2", "pong")
            .direct_to("u1")
            .at("2024-05-01T10:01:00Z")
            .record(),
    )
    .unwrap();
    let groups = group(&log, &ConversationKeyResolver::default());
    let key = ConversationKey::direct(&UserId::from("u2"), &UserId::from("u1")).unwrap();
    assert_eq!(key.as_str(), "dm_u1___u2");
    let bodies: Vec<&str> = groups[&key].iter().filter_map(|m| m.body()).collect();
    assert_eq!(bodies, vec!["ping", "pong"]);
}

#[test]
fn test_reserved_room_never_listed_or_routed() {
    let rooms = visible_rooms(["General", "dm_u1___u2", "Random"]);
    assert!(rooms.iter().all(|k| !k.is_direct()));
    assert_eq!(rooms.len(), 2);

    let mut log = EventLog::new();
    log.ingest(RecordBuilder::text("m1", "u1", "sneaky").in_room("dm_u1___u2").record())
        .unwrap();
    let groups = group(&log, &ConversationKeyResolver::default());
    assert!(groups.is_empty());
}

#[test]
fn test_local_echo_then_confirmation_shows_once() {
    let mut log = EventLog::new();
    log.ingest(RecordBuilder::provisional("tmp-7", "u1", "hello").record()).unwrap();
    log.ingest(
        RecordBuilder::text("m7", "u1", "hello")
            .with_temp_id("tmp-7")
            .delivered()
            .record(),
    )
    .unwrap();
    let groups = group(&log, &ConversationKeyResolver::default());
    let general = &groups["General"];
    assert_eq!(general.len(), 1);
    assert!(general[0].identity.is_confirmed());
    assert!(general[0].delivered);
}

#[test]
fn test_unread_counts_follow_activity() {
    let general = ConversationKey::default_room();
    let random = ConversationKey::room("Random").unwrap();
    let mut unread = UnreadTracker::new();

    unread.on_message_arrived(&random, false, false);
    unread.on_message_arrived(&random, false, false);
    unread.on_message_arrived(&general, false, true);
    assert_eq!(unread.get(&random), 2);
    assert_eq!(unread.get(&general), 0);

    unread.clear(&random);
    assert_eq!(unread.total(), 0);
}
