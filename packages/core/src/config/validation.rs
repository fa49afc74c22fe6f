//! Configuration validation with actionable error messages
//!
//! Validates the configuration and says exactly which setting to change.

use super::schema::Config;

/// Shortest console session the federation endpoint accepts, in minutes
pub const MIN_CONSOLE_DURATION_MINUTES: u32 = 15;

/// Longest console session the federation endpoint accepts, in minutes
pub const MAX_CONSOLE_DURATION_MINUTES: u32 = 720;

/// A configuration validation error with a suggested fix
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The config field that has an error
    pub field: String,
    /// Description of what's wrong
    pub message: String,
    /// Config change that resolves the issue
    pub fix_hint: String,
}

/// A configuration validation warning (non-fatal)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The config field with a potential issue
    pub field: String,
    /// Description of the warning
    pub message: String,
    /// Suggested config change
    pub fix_hint: String,
}

/// Validate configuration and return warnings or first error
///
/// `known_shells` lists the shells that `shell_paths` may refer to.
/// Validation is performed in order, stopping at the first error.
pub fn validate_config(
    config: &Config,
    known_shells: &[&str],
) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();

    if let Err(message) = validate_duration_minutes(config.console_duration_minutes) {
        return Err(ValidationError {
            field: "console_duration_minutes".to_string(),
            message,
            fix_hint: r#""console_duration_minutes": 60"#.to_string(),
        });
    }

    if config.console_issuer.trim().is_empty() {
        return Err(ValidationError {
            field: "console_issuer".to_string(),
            message: "console_issuer cannot be empty".to_string(),
            fix_hint: r#""console_issuer": "awscred""#.to_string(),
        });
    }

    if config.console_destination.trim().is_empty() {
        return Err(ValidationError {
            field: "console_destination".to_string(),
            message: "console_destination cannot be empty".to_string(),
            fix_hint: r#""console_destination": "https://console.aws.amazon.com""#.to_string(),
        });
    }

    if !config.federation_endpoint.starts_with("https://") {
        return Err(ValidationError {
            field: "federation_endpoint".to_string(),
            message: "federation_endpoint must be an https:// URL; credentials are sent to it"
                .to_string(),
            fix_hint: r#""federation_endpoint": "https://signin.aws.amazon.com/federation""#
                .to_string(),
        });
    }

    // Warnings (non-fatal)

    for shell in config.shell_paths.keys() {
        if !known_shells.contains(&shell.as_str()) {
            warnings.push(ValidationWarning {
                field: format!("shell_paths.{shell}"),
                message: format!(
                    "Unsupported shell '{shell}' is ignored (supported: {})",
                    known_shells.join(", ")
                ),
                fix_hint: format!("remove \"{shell}\" from shell_paths"),
            });
        }
    }

    if let Some(browser) = &config.browser
        && browser.trim().is_empty()
    {
        warnings.push(ValidationWarning {
            field: "browser".to_string(),
            message: "Empty browser command; the system default browser is used".to_string(),
            fix_hint: "remove \"browser\" from config.json".to_string(),
        });
    }

    Ok(warnings)
}

/// Check a console session duration in minutes
pub fn validate_duration_minutes(minutes: u32) -> Result<(), String> {
    if (MIN_CONSOLE_DURATION_MINUTES..=MAX_CONSOLE_DURATION_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(format!(
            "Console session duration must be between {MIN_CONSOLE_DURATION_MINUTES} and {MAX_CONSOLE_DURATION_MINUTES} minutes (got {minutes})"
        ))
    }
}

/// Format a validation error for display
pub fn display_validation_error(error: &ValidationError) -> String {
    format!(
        "Error: {}\n  Field: {}\n  Fix:   set {} in config.json",
        error.message, error.field, error.fix_hint
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SHELLS: [&str; 3] = ["bash", "fish", "zsh"];

    #[test]
    fn test_default_config_is_valid() {
        let warnings = validate_config(&Config::default(), &SHELLS).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_duration_out_of_range() {
        for minutes in [0, 14, 721] {
            let config = Config {
                console_duration_minutes: minutes,
                ..Config::default()
            };
            let err = validate_config(&config, &SHELLS).unwrap_err();
            assert_eq!(err.field, "console_duration_minutes");
        }
        assert!(validate_duration_minutes(15).is_ok());
        assert!(validate_duration_minutes(720).is_ok());
    }

    #[test]
    fn test_empty_issuer_rejected() {
        let config = Config {
            console_issuer: "  ".to_string(),
            ..Config::default()
        };
        let err = validate_config(&config, &SHELLS).unwrap_err();
        assert_eq!(err.field, "console_issuer");
    }

    #[test]
    fn test_plain_http_endpoint_rejected() {
        let config = Config {
            federation_endpoint: "http://signin.aws.amazon.com/federation".to_string(),
            ..Config::default()
        };
        let err = validate_config(&config, &SHELLS).unwrap_err();
        assert_eq!(err.field, "federation_endpoint");
        assert!(display_validation_error(&err).contains("Fix:"));
    }

    #[test]
    fn test_unknown_shell_path_warns() {
        let mut config = Config::default();
        config
            .shell_paths
            .insert("tcsh".to_string(), PathBuf::from("/home/u/.tcshrc"));
        config
            .shell_paths
            .insert("zsh".to_string(), PathBuf::from("/home/u/.zshenv"));
        let warnings = validate_config(&config, &SHELLS).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "shell_paths.tcsh");
    }

    #[test]
    fn test_empty_browser_warns() {
        let config = Config {
            browser: Some(String::new()),
            ..Config::default()
        };
        let warnings = validate_config(&config, &SHELLS).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "browser");
    }
}
