//! Free-text search and match highlighting

use crate::message::Message;
use regex::RegexBuilder;

/// Keep messages whose body, sender name, file name or raw timestamp contains `query`.
///
/// Matching is case-insensitive. A blank query keeps everything.
pub fn search<'a, I>(messages: I, query: &str) -> Vec<&'a Message>
where
    I: IntoIterator<Item = &'a Message>,
{
    if query.trim().is_empty() {
        return messages.into_iter().collect();
    }
    let needle = query.to_lowercase();
    messages
        .into_iter()
        .filter(|m| matches_query(m, &needle))
        .collect()
}

fn matches_query(message: &Message, needle: &str) -> bool {
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(needle));
    contains(message.body())
        || contains(Some(&message.sender_name))
        || contains(message.file_name())
        || contains(Some(message.timestamp.raw()))
}

/// Escape text for safe embedding in markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap every case-insensitive occurrence of `query` in `<mark>`.
///
/// The query is matched literally. A blank query, or one the regex engine
/// refuses, yields the escaped text without marks.
pub fn highlight(text: &str, query: &str) -> String {
    if query.is_empty() {
        return escape_html(text);
    }
    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::debug!(error = %err, "highlight pattern rejected, rendering plain text");
            return escape_html(text);
        }
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() == found.end() {
            continue;
        }
        out.push_str(&escape_html(&text[last..found.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</mark>");
        last = found.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}
