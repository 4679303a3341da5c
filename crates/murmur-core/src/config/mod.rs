//! Configuration primitives
//!
//! Concrete configuration types live in the crates that own the settings
//! (`murmur-app::AppConfig`). This module provides the shared loading and
//! validation machinery.

mod traits;
mod validation;

pub use traits::{env_override, MurmurConfig, ENV_PREFIX};
pub use validation::{ConfigValidator, ValidationError, ValidationResult};
