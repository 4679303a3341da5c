//! Property tests for the grouping, filter, search and sort pipeline

#![allow(clippy::unwrap_used)]

use murmur_chat::{
    group, search, sort_chronological, sorted_chronological, ConversationKey,
    ConversationKeyResolver, EventLog, Message,
};
use murmur_testkit::strategies::{
    arb_any_user_id, arb_filter_state, arb_messages, arb_room_name, arb_user_id,
};
use proptest::prelude::*;

fn render_keys(messages: &[&Message]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m.identity.render_key().to_string())
        .collect()
}

proptest! {
    #[test]
    fn prop_filter_and_search_only_narrow(
        messages in arb_messages(24),
        state in arb_filter_state(),
    ) {
        let filtered = state.apply(&messages);
        prop_assert!(filtered.len() <= messages.len());
        let searched = search(filtered.iter().copied(), &state.query);
        prop_assert!(searched.len() <= filtered.len());
        for m in &searched {
            prop_assert!(messages.iter().any(|orig| std::ptr::eq(orig, *m)));
        }
    }

    #[test]
    fn prop_filter_preserves_relative_order(
        messages in arb_messages(24),
        state in arb_filter_state(),
    ) {
        let positions: Vec<usize> = state
            .apply(&messages)
            .iter()
            .map(|m| messages.iter().position(|orig| std::ptr::eq(orig, *m)).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_sort_is_ordered_and_stable(messages in arb_messages(24)) {
        let sorted = sorted_chronological(&messages);
        prop_assert_eq!(sorted.len(), messages.len());
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(a.timestamp.instant() <= b.timestamp.instant());
            if a.timestamp.instant() == b.timestamp.instant() {
                let pa = messages.iter().position(|m| std::ptr::eq(m, a)).unwrap();
                let pb = messages.iter().position(|m| std::ptr::eq(m, b)).unwrap();
                prop_assert!(pa < pb);
            }
        }
    }

    #[test]
    fn prop_sort_is_idempotent(messages in arb_messages(16)) {
        let mut once = sorted_chronological(&messages);
        let before = render_keys(&once);
        sort_chronological(&mut once);
        prop_assert_eq!(render_keys(&once), before);
    }

    #[test]
    fn prop_ingesting_twice_changes_nothing(messages in arb_messages(16)) {
        let resolver = ConversationKeyResolver::default();
        let mut log = EventLog::new();
        for m in &messages {
            log.push(m.clone());
        }
        let once: Vec<(String, Vec<String>)> = group(&log, &resolver)
            .iter()
            .map(|(k, v)| (k.to_string(), render_keys(v)))
            .collect();
        for m in &messages {
            log.push(m.clone());
        }
        let twice: Vec<(String, Vec<String>)> = group(&log, &resolver)
            .iter()
            .map(|(k, v)| (k.to_string(), render_keys(v)))
            .collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_direct_key_never_collides_with_room(
        a in arb_any_user_id(),
        b in arb_any_user_id(),
        room in arb_room_name(),
    ) {
        let forward = ConversationKey::direct(&a, &b);
        let reversed = ConversationKey::direct(&b, &a);
        prop_assert_eq!(&forward, &reversed);
        if let (Some(direct), Ok(room_key)) = (forward, ConversationKey::room(&room)) {
            prop_assert_ne!(direct, room_key);
        }
    }

    #[test]
    fn prop_distinct_pairs_never_share_a_key(
        a in arb_any_user_id(),
        b in arb_any_user_id(),
        c in arb_any_user_id(),
        d in arb_any_user_id(),
    ) {
        let same_pair = (a == c && b == d) || (a == d && b == c);
        prop_assume!(!same_pair);
        if let (Some(first), Some(second)) =
            (ConversationKey::direct(&a, &b), ConversationKey::direct(&c, &d))
        {
            prop_assert_ne!(first, second);
        }
    }

    #[test]
    fn prop_direct_key_splits_back_into_its_pair(a in arb_any_user_id(), b in arb_any_user_id()) {
        if let Some(key) = ConversationKey::direct(&a, &b) {
            let (lo, hi) = key.participants().unwrap();
            let expected = if a <= b { (a, b) } else { (b, a) };
            prop_assert_eq!((lo, hi), expected);
        }
    }

    #[test]
    fn prop_self_and_partner_round_trip(a in arb_user_id(), b in arb_user_id()) {
        prop_assume!(a != b);
        let key = ConversationKey::direct(&a, &b).unwrap();
        prop_assert_eq!(key.other_participant(&a), Some(b.clone()));
        prop_assert_eq!(key.other_participant(&b), Some(a));
    }
}
