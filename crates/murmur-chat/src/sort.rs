//! Chronological ordering of a conversation view

use crate::message::Message;

/// Sort messages oldest first.
///
/// The sort is stable: messages with equal instants keep their incoming order.
/// Messages whose timestamp does not parse sort before all others.
pub fn sort_chronological(messages: &mut [&Message]) {
    messages.sort_by(|a, b| a.timestamp.chronological_cmp(&b.timestamp));
}

/// Owned variant of [`sort_chronological`]
#[must_use]
pub fn sorted_chronological<'a, I>(messages: I) -> Vec<&'a Message>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut out: Vec<&Message> = messages.into_iter().collect();
    sort_chronological(&mut out);
    out
}
