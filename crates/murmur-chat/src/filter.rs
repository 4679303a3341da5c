//! # Structured Message Filters
//!
//! The filter stage of the view pipeline. Exactly one [`FilterMode`] is active
//! at a time; its parameters live in [`FilterState`] alongside the free-text
//! query consumed by [`crate::search`].

use crate::message::Message;
use chrono::NaiveDate;
use murmur_core::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format accepted for date bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a filter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A date bound was not `YYYY-MM-DD`
    #[error("invalid date '{raw}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Value received
        raw: String,
    },
}

impl From<FilterError> for murmur_core::MurmurError {
    fn from(err: FilterError) -> Self {
        murmur_core::MurmurError::invalid(err.to_string())
    }
}

/// Which structured filter is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Everything
    #[default]
    All,
    /// Messages with a non-empty body
    Text,
    /// File shares with a URL
    Files,
    /// Messages from one sender
    Sender,
    /// Messages within a date range
    Date,
}

impl FilterMode {
    /// Parse a mode name. Unknown names fall back to [`FilterMode::All`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "files" => Self::Files,
            "sender" => Self::Sender,
            "date" => Self::Date,
            _ => Self::All,
        }
    }

    /// Mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Text => "text",
            Self::Files => "files",
            Self::Sender => "sender",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an optional date bound: blank means unset
pub fn parse_date_bound(raw: &str) -> Result<Option<NaiveDate>, FilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FilterError::InvalidDate {
            raw: raw.to_string(),
        })
}

/// Filter and search parameters for the active view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Active structured filter
    pub mode: FilterMode,
    /// Sender for [`FilterMode::Sender`]
    pub sender: Option<UserId>,
    /// Inclusive lower day for [`FilterMode::Date`]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper day for [`FilterMode::Date`]
    pub date_to: Option<NaiveDate>,
    /// Free-text search query
    pub query: String,
}

impl FilterState {
    /// No filtering, no query
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active mode
    #[must_use]
    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set or clear the sender parameter. Blank ids clear it.
    #[must_use]
    pub fn with_sender(mut self, sender: Option<&str>) -> Self {
        self.sender = sender
            .filter(|s| !s.trim().is_empty())
            .map(UserId::from);
        self
    }

    /// Set both date bounds from `YYYY-MM-DD` strings. Blank strings clear a bound.
    pub fn with_date_range(mut self, from: &str, to: &str) -> Result<Self, FilterError> {
        self.date_from = parse_date_bound(from)?;
        self.date_to = parse_date_bound(to)?;
        Ok(self)
    }

    /// Replace the search query
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Back to the default state: mode `All`, no parameters, empty query
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `message` passes the active structured filter
    pub fn matches(&self, message: &Message) -> bool {
        match self.mode {
            FilterMode::All => true,
            FilterMode::Text => message.body().is_some_and(|b| !b.is_empty()),
            FilterMode::Files => message.file_url().is_some_and(|u| !u.trim().is_empty()),
            FilterMode::Sender => match &self.sender {
                Some(sender) => &message.sender_id == sender,
                None => true,
            },
            FilterMode::Date => {
                if self.date_from.is_none() && self.date_to.is_none() {
                    return true;
                }
                let Some(day) = message.timestamp.utc_day() else {
                    return false;
                };
                self.date_from.map_or(true, |from| day >= from)
                    && self.date_to.map_or(true, |to| day <= to)
            }
        }
    }

    /// Keep the messages passing the active structured filter, preserving order
    pub fn apply<'a, I>(&self, messages: I) -> Vec<&'a Message>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        messages.into_iter().filter(|m| self.matches(m)).collect()
    }
}
