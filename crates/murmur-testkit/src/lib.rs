//! Murmur Testing Infrastructure
//!
//! Shared fixtures and proptest strategies for tests across the Murmur crates.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! murmur-testkit = { workspace = true }
//! ```
//!
//! Then in an integration test:
//! ```rust,no_run
//! use murmur_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     init_test_tracing();
//!     let msg = RecordBuilder::text("m1", "u1", "hello").message();
//!     assert_eq!(msg.body(), Some("hello"));
//! }
//! ```

pub mod fixtures;
pub mod strategies;

pub use fixtures::*;

/// Install a test-writer tracing subscriber. Safe to call from every test.
///
/// Honors `RUST_LOG`; defaults to `debug` for the Murmur crates.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,murmur_chat=debug,murmur_app=debug")
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
