//! Core configuration trait

use crate::MurmurError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Prefix for environment variable overrides (`MURMUR_DEFAULT_ROOM`, ...)
pub const ENV_PREFIX: &str = "MURMUR_";

/// Core trait for Murmur configuration types
///
/// Loading order is defaults → file → environment → explicit `set_from_string`
/// calls, with [`MurmurConfig::validate`] run by [`MurmurConfig::load`] once
/// all layers are applied.
pub trait MurmurConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    fn load_from_file(path: &Path) -> Result<Self, MurmurError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MurmurError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    fn from_toml_str(content: &str) -> Result<Self, MurmurError> {
        toml::from_str(content).map_err(MurmurError::from)
    }

    /// Apply `MURMUR_*` environment overrides
    fn merge_with_env(&mut self) -> Result<(), MurmurError> {
        let overrides: Vec<(String, String)> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|k| (k.to_lowercase(), value))
            })
            .collect();
        for (key, value) in overrides {
            self.set_from_string(&key, &value)?;
        }
        Ok(())
    }

    /// Set a configuration value from a string key (`upload.endpoint`, `default_room`)
    ///
    /// Unknown keys are an error so typos surface instead of being ignored.
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), MurmurError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), MurmurError>;

    /// Defaults, then the optional file, then the environment; validated
    fn load(path: Option<&Path>) -> Result<Self, MurmurError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Read a single `MURMUR_<NAME>` variable
pub fn env_override(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{}", name.to_uppercase())).ok()
}
