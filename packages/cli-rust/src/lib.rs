//! awscred CLI - shell integration and AWS console sign-in
//!
//! This module contains the CLI implementation used by the binary.

mod clipboard;
mod commands;
mod constants;
mod output;

use anyhow::{Result, anyhow};
use awscred_core::config::{
    self, Config, ValidationWarning, display_validation_error, load_config_from, validate_config,
};
use awscred_core::get_version;
use awscred_core::shell::ShellRegistry;
use clap::{Parser, Subcommand};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// AWS credential helper
#[derive(Parser)]
#[command(name = "awscred")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shell integration and AWS console sign-in for temporary credentials", long_about = None)]
#[command(after_help = get_examples())]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the awscred block in shell startup files
    Shell(commands::ShellArgs),
    /// Open the AWS web console using temporary credentials
    Console(commands::ConsoleArgs),
    /// Manage configuration
    Config(commands::ConfigArgs),
}

fn get_examples() -> &'static str {
    r#"Examples:
  awscred shell install               add awscred to your login shell's startup file
  eval "$(awscred shell source)"      load the integration into the current shell
  awscred console --print             print a console sign-in URL for $AWS_* credentials"#
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stderr keeps `shell source` output on stdout clean for eval
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("awscred {}", get_version());

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if let Commands::Config(ref args) = cli.command
        && args.skips_config_load()
    {
        return commands::cmd_config(args, &Config::default(), cli.quiet);
    }

    let config_path = config::paths::get_config_path()
        .ok_or_else(|| anyhow!("Could not determine config path"))?;

    let config = match load_config_from(&config_path) {
        Ok(config) => {
            if cli.verbose > 0 && config_path.exists() {
                eprintln!(
                    "{} Config loaded from: {}",
                    style("[info]").cyan(),
                    config_path.display()
                );
            }
            config
        }
        Err(e) => {
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    let registry = build_registry(&config)?;
    let known_shells: Vec<&str> = registry.names().collect();
    match validate_config(&config, &known_shells) {
        Ok(warnings) => {
            if !cli.quiet {
                print_validation_warnings(&warnings);
            }
        }
        Err(e) => {
            eprintln!("{}", display_validation_error(&e));
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            std::process::exit(1);
        }
    }

    match cli.command {
        Commands::Shell(args) => commands::cmd_shell(args, &registry, cli.quiet, cli.verbose),
        Commands::Console(args) => commands::cmd_console(&args, &config, cli.quiet),
        Commands::Config(args) => commands::cmd_config(&args, &config, cli.quiet),
    }
}

/// Built-in shell table with the config's path overrides applied
fn build_registry(config: &Config) -> Result<ShellRegistry> {
    let mut registry = ShellRegistry::from_env()
        .ok_or_else(|| anyhow!("Could not determine your home directory (is HOME set?)"))?;

    for (shell, path) in &config.shell_paths {
        if registry.contains(shell) {
            registry = registry.with_path_override(shell, commands::expand_home(path))?;
        } else {
            debug!("ignoring shell_paths entry for unknown shell {shell}");
        }
    }
    Ok(registry)
}

fn print_validation_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        eprintln!(
            "{} {} ({})",
            style("Warning:").yellow().bold(),
            warning.message,
            style(&warning.field).dim()
        );
        eprintln!("  {} set {}", style("Fix:").cyan(), warning.fix_hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_shell_install_with_overrides() {
        let cli = Cli::try_parse_from([
            "awscred", "-v", "shell", "install", "--shell", "zsh", "--path", "/tmp/rc",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Commands::Shell(_)));
    }

    #[test]
    fn print_and_clipboard_conflict() {
        let result = Cli::try_parse_from(["awscred", "console", "--print", "--clipboard"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_path_skips_config_load() {
        let cli = Cli::try_parse_from(["awscred", "config", "path"]).unwrap();
        match cli.command {
            Commands::Config(args) => assert!(args.skips_config_load()),
            _ => panic!("expected config command"),
        }
    }
}
