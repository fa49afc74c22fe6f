//! Config subcommand implementations
//!
//! Provides `awscred config` subcommands for viewing and creating the config file.

use anyhow::{Result, anyhow, bail};
use awscred_core::config::{Config, paths, save_config};
use clap::{Args, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use console::style;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration management subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current configuration
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

impl ConfigArgs {
    /// True when the command does not need a valid config to run
    pub fn skips_config_load(&self) -> bool {
        matches!(
            self.command,
            Some(ConfigSubcommands::Path | ConfigSubcommands::Init { .. })
        )
    }
}

/// Handle config command
///
/// Defaults to Show when no subcommand is given.
pub fn cmd_config(args: &ConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match &args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(config, *json || args.json),
        Some(ConfigSubcommands::Path) => cmd_config_path(),
        Some(ConfigSubcommands::Init { force }) => cmd_config_init(*force, quiet),
        None => cmd_config_show(config, args.json),
    }
}

fn cmd_config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Setting", "Value"]);
    for (key, value) in config_rows(config) {
        table.add_row(vec![key, value]);
    }
    println!("{table}");
    Ok(())
}

fn config_rows(config: &Config) -> Vec<(String, String)> {
    let mut rows = vec![
        ("version".to_string(), config.version.to_string()),
        (
            "browser".to_string(),
            config
                .browser
                .clone()
                .unwrap_or_else(|| "(system default)".to_string()),
        ),
        ("console_issuer".to_string(), config.console_issuer.clone()),
        (
            "console_destination".to_string(),
            config.console_destination.clone(),
        ),
        (
            "console_duration_minutes".to_string(),
            config.console_duration_minutes.to_string(),
        ),
        (
            "federation_endpoint".to_string(),
            config.federation_endpoint.clone(),
        ),
    ];
    for (shell, path) in &config.shell_paths {
        rows.push((format!("shell_paths.{shell}"), path.display().to_string()));
    }
    rows
}

fn cmd_config_path() -> Result<()> {
    let path = paths::get_config_path().ok_or_else(|| anyhow!("Could not determine config path"))?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_config_init(force: bool, quiet: bool) -> Result<()> {
    let path = paths::get_config_path().ok_or_else(|| anyhow!("Could not determine config path"))?;
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite it with defaults.",
            path.display()
        );
    }

    let path = save_config(&Config::default())?;
    if !quiet {
        println!(
            "{} Wrote default config to {}",
            style("Success:").green().bold(),
            style(path.display()).cyan()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_rows_include_overrides() {
        let mut config = Config::default();
        config
            .shell_paths
            .insert("bash".to_string(), PathBuf::from("/home/u/.bashrc"));
        let rows = config_rows(&config);
        assert!(rows.contains(&("browser".to_string(), "(system default)".to_string())));
        assert!(rows.contains(&(
            "shell_paths.bash".to_string(),
            "/home/u/.bashrc".to_string()
        )));
    }
}
