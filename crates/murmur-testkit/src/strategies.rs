//! Property test strategies for Murmur types
//!
//! Ids are drawn from small pools so generated logs contain the collisions
//! (same sender, same room, same instant) that dedupe, filter and sort logic
//! has to handle.

use murmur_chat::{FilterMode, FilterState, Message, MessageRecord};
use murmur_core::UserId;
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Strategy for user ids from a pool of eight
pub fn arb_user_id() -> impl Strategy<Value = UserId> {
    (0u8..8).prop_map(|n| UserId::from(format!("u{n}")))
}

/// Strategy for arbitrary non-empty user ids.
///
/// Half are drawn from a tiny underscore-heavy alphabet so ids containing or
/// bordering the direct key delimiter show up often.
pub fn arb_any_user_id() -> impl Strategy<Value = UserId> {
    prop_oneof!["[a-z0-9_-]{1,16}", "[aA_]{1,6}"].prop_map(UserId::from)
}

/// Strategy for room names that are valid conversation keys
pub fn arb_room_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("General".to_string()),
        Just("Random".to_string()),
        "[A-Za-z][A-Za-z0-9 ]{0,10}",
    ]
}

/// Strategy for raw timestamps: mostly RFC 3339 in May 2024, some unparsable
pub fn arb_raw_timestamp() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (1u32..=5, 0u32..24, 0u32..60).prop_map(|(day, hour, minute)| {
            format!("2024-05-{day:02}T{hour:02}:{minute:02}:00.000Z")
        }),
        1 => Just("not a timestamp".to_string()),
        1 => Just(String::new()),
    ]
}

/// Strategy for a validated room message; ids are assigned by [`arb_messages`]
fn arb_room_message(index: usize) -> impl Strategy<Value = Message> {
    (
        arb_user_id(),
        arb_raw_timestamp(),
        prop_oneof![
            "[a-z ]{0,12}".prop_map(|body| (Some(body), None)),
            "[a-z]{1,8}".prop_map(|name| (None, Some(name))),
        ],
    )
        .prop_map(move |(sender, timestamp, (body, file))| {
            MessageRecord {
                id: Some(format!("m{index}")),
                sender_id: Some(sender.to_string()),
                sender: Some(sender.to_string().to_uppercase()),
                kind: Some(if file.is_some() { "file" } else { "text" }.to_string()),
                message: body,
                url: file.as_ref().map(|f| format!("https://files.test/{f}.png")),
                file_name: file.map(|f| format!("{f}.png")),
                timestamp: Some(timestamp),
                ..Default::default()
            }
            .into_message()
            .expect("generated record should validate")
        })
}

/// Strategy for up to `max` room messages with distinct confirmed ids
pub fn arb_messages(max: usize) -> impl Strategy<Value = Vec<Message>> {
    (0..=max).prop_flat_map(|len| (0..len).map(arb_room_message).collect::<Vec<_>>())
}

/// Strategy for filter modes
pub fn arb_filter_mode() -> impl Strategy<Value = FilterMode> {
    prop_oneof![
        Just(FilterMode::All),
        Just(FilterMode::Text),
        Just(FilterMode::Files),
        Just(FilterMode::Sender),
        Just(FilterMode::Date),
    ]
}

/// Strategy for a full filter state, query included
pub fn arb_filter_state() -> impl Strategy<Value = FilterState> {
    (
        arb_filter_mode(),
        proptest::option::of(arb_user_id()),
        proptest::option::of(1u32..=5),
        proptest::option::of(1u32..=5),
        prop_oneof![Just(String::new()), "[a-zU0-9]{1,3}"],
    )
        .prop_map(|(mode, sender, from, to, query)| {
            let day = |d: u32| format!("2024-05-{d:02}");
            FilterState::new()
                .with_mode(mode)
                .with_sender(sender.as_ref().map(UserId::as_str))
                .with_date_range(
                    &from.map(day).unwrap_or_default(),
                    &to.map(day).unwrap_or_default(),
                )
                .expect("generated dates are valid")
                .with_query(query)
        })
}
