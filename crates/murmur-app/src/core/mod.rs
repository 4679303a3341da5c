//! # Application Core
//!
//! The session state machine and the reducer that turns its event log into
//! views.

pub mod reducer;
pub mod session;

pub use reducer::{reduce_view, ViewDelta};
pub use session::{Activation, ActivationState, ChatSession, EventOutcome};
