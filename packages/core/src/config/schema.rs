//! Configuration schema for awscred
//!
//! Defines the structure and defaults for the config.json file.

use crate::federation::{DEFAULT_CONSOLE_DESTINATION, FEDERATION_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for awscred
///
/// Serialized to/from `~/.config/awscred/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// Browser command used to open console URLs (default: system browser)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    /// Issuer passed to the console login URL (default: "awscred")
    #[serde(default = "default_console_issuer")]
    pub console_issuer: String,

    /// Console page to land on after sign-in
    #[serde(default = "default_console_destination")]
    pub console_destination: String,

    /// Console session length in minutes (default: 60)
    #[serde(default = "default_console_duration_minutes")]
    pub console_duration_minutes: u32,

    /// Federation endpoint used to obtain sign-in tokens
    #[serde(default = "default_federation_endpoint")]
    pub federation_endpoint: String,

    /// Per-shell override of the startup file to edit, e.g. {"bash": "~/.bashrc"}
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shell_paths: BTreeMap<String, PathBuf>,
}

fn default_console_issuer() -> String {
    "awscred".to_string()
}

fn default_console_destination() -> String {
    DEFAULT_CONSOLE_DESTINATION.to_string()
}

fn default_console_duration_minutes() -> u32 {
    60
}

fn default_federation_endpoint() -> String {
    FEDERATION_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            browser: None,
            console_issuer: default_console_issuer(),
            console_destination: default_console_destination(),
            console_duration_minutes: default_console_duration_minutes(),
            federation_endpoint: default_federation_endpoint(),
            shell_paths: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.browser, None);
        assert_eq!(config.console_issuer, "awscred");
        assert_eq!(config.console_destination, "https://console.aws.amazon.com");
        assert_eq!(config.console_duration_minutes, 60);
        assert_eq!(
            config.federation_endpoint,
            "https://signin.aws.amazon.com/federation"
        );
        assert!(config.shell_paths.is_empty());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let mut config = Config::default();
        config.browser = Some("firefox".to_string());
        config
            .shell_paths
            .insert("bash".to_string(), PathBuf::from("/home/u/.bashrc"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"version": 1}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"version": 1, "unknown_field": "value"}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
