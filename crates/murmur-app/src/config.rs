//! Application configuration
//!
//! Loaded from TOML through [`MurmurConfig`]; every key has a default so an
//! empty file (or no file) is a valid configuration.
//!
//! ```toml
//! default_room = "General"
//! auto_join_default_room = true
//! log_filter = "info"
//!
//! [upload]
//! endpoint = "http://localhost:5000/api/upload"
//! timeout_ms = 30000
//! ```

use murmur_chat::{ConversationKey, ConversationKeyResolver, DEFAULT_ROOM};
use murmur_core::config::{ConfigValidator, MurmurConfig};
use murmur_core::MurmurError;
use serde::{Deserialize, Serialize};

/// Default upload endpoint
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:5000/api/upload";

/// Default upload timeout
pub const DEFAULT_UPLOAD_TIMEOUT_MS: u32 = 30_000;

/// File upload settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Multipart POST target
    pub endpoint: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_UPLOAD_TIMEOUT_MS,
        }
    }
}

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Room joined on connect and used for room messages without a room
    pub default_room: String,
    /// Whether connecting activates the default room
    pub auto_join_default_room: bool,
    /// `tracing` filter directive
    pub log_filter: String,
    /// Upload settings
    pub upload: UploadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_room: DEFAULT_ROOM.to_string(),
            auto_join_default_room: true,
            log_filter: "info".to_string(),
            upload: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Key resolver routing room messages without a room to the default room
    pub fn resolver(&self) -> Result<ConversationKeyResolver, MurmurError> {
        Ok(ConversationKeyResolver::new(&self.default_room)?)
    }

    /// Key of the default room
    pub fn default_room_key(&self) -> Result<ConversationKey, MurmurError> {
        Ok(ConversationKey::room(&self.default_room)?)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, MurmurError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(MurmurError::config(format!(
            "Invalid boolean for {key}: {other}"
        ))),
    }
}

impl MurmurConfig for AppConfig {
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), MurmurError> {
        match key {
            "default_room" => self.default_room = value.to_string(),
            "auto_join_default_room" => self.auto_join_default_room = parse_bool(key, value)?,
            "log_filter" => self.log_filter = value.to_string(),
            "upload.endpoint" | "upload_endpoint" => self.upload.endpoint = value.to_string(),
            "upload.timeout_ms" | "upload_timeout_ms" => {
                self.upload.timeout_ms = value.trim().parse().map_err(|_| {
                    MurmurError::config(format!("Invalid timeout for {key}: {value}"))
                })?;
            }
            _ => {
                return Err(MurmurError::config(format!(
                    "Unknown configuration key: {key}"
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), MurmurError> {
        let mut validator = ConfigValidator::new();
        validator
            .non_empty("default_room", &self.default_room)
            .custom(
                "default_room",
                self.default_room.as_str(),
                |room: &str| ConversationKey::room(room).is_ok(),
                "must be a valid room name outside the direct message key space",
            )
            .non_empty("log_filter", &self.log_filter);

        let mut upload = validator.for_field("upload");
        upload
            .non_empty("endpoint", &self.upload.endpoint)
            .range("timeout_ms", self.upload.timeout_ms, Some(1), None);
        validator.merge(upload);

        validator.result().map_err(MurmurError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_room, "General");
        assert!(config.auto_join_default_room);
        assert_eq!(config.upload.endpoint, DEFAULT_UPLOAD_ENDPOINT);
        assert_eq!(config.upload.timeout_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            default_room = "Lobby"

            [upload]
            timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.default_room, "Lobby");
        assert_eq!(config.upload.timeout_ms, 5000);
        assert_eq!(config.upload.endpoint, DEFAULT_UPLOAD_ENDPOINT);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_reserved_default_room_rejected() {
        let mut config = AppConfig::default();
        config.set_from_string("default_room", "dm_lobby").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_room"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.set_from_string("upload_timeout_ms", "0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upload.timeout_ms"));
    }

    #[test]
    fn test_set_from_string() {
        let mut config = AppConfig::default();
        config.set_from_string("upload.endpoint", "https://up.test/api").unwrap();
        config.set_from_string("auto_join_default_room", "off").unwrap();
        assert_eq!(config.upload.endpoint, "https://up.test/api");
        assert!(!config.auto_join_default_room);
        assert!(config.set_from_string("auto_join_default_room", "maybe").is_err());
        assert!(config.set_from_string("colour", "blue").is_err());
        assert!(config.set_from_string("upload.timeout_ms", "soon").is_err());
    }

    #[test]
    fn test_resolver_uses_default_room() {
        let config = AppConfig {
            default_room: "Lobby".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.resolver().unwrap().default_room().as_str(), "Lobby");
        assert_eq!(config.default_room_key().unwrap().as_str(), "Lobby");
    }
}
