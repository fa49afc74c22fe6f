//! awscred-core - shared library for the awscred CLI
//!
//! This crate provides:
//! - Shell startup file integration (managed block install/uninstall)
//! - AWS console federation (sign-in token exchange and login URLs)
//! - Configuration management

pub mod config;
pub mod federation;
pub mod shell;

pub use config::{Config, ConfigError, load_config_from, save_config};
pub use federation::{Credentials, FederationClient, FederationError};
pub use shell::{BlockEditor, ShellError, ShellRegistry};

/// Library version from Cargo.toml
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
