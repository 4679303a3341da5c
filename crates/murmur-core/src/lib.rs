//! Murmur Core - Foundation Types
//!
//! This crate provides the small set of types every other Murmur crate builds on.
//! It contains no chat semantics and performs no I/O beyond reading configuration files.
//!
//! # Modules
//!
//! - [`errors`]: Unified [`MurmurError`] and [`Result`] alias
//! - [`identifiers`]: Typed identifiers for users and messages
//! - [`time`]: [`Timestamp`], the raw-plus-parsed instant carried by messages
//! - [`config`]: Configuration traits and validation helpers

#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod time;

pub use errors::{MurmurError, Result};
pub use identifiers::{MessageId, TempId, UserId};
pub use time::Timestamp;
