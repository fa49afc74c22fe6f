//! Shell subcommand implementations
//!
//! `awscred shell install|uninstall|source|status` manage the awscred block
//! in shell startup files.

use crate::constants::SHELL_ENV;
use crate::output::{format_shell_error, format_shell_error_anyhow, state_style};
use anyhow::{Context, Result, anyhow, bail};
use awscred_core::shell::{
    Bindings, BlockEditor, InstallOutcome, ShellError, ShellRegistry, UninstallOutcome,
    detect_shell, render,
};
use clap::{Args, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use console::style;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Shell integration command arguments
#[derive(Args)]
pub struct ShellArgs {
    #[command(subcommand)]
    command: ShellCommands,
}

/// Shell integration subcommands
#[derive(Subcommand)]
pub enum ShellCommands {
    /// Install or update the awscred block in your shell startup file
    Install(TargetArgs),
    /// Remove the awscred block from your shell startup file
    Uninstall(TargetArgs),
    /// Print the integration script, for `eval "$(awscred shell source)"`
    Source {
        /// Shell dialect (default: your login shell)
        #[arg(long)]
        shell: Option<String>,
    },
    /// Show which startup files contain the awscred block
    Status,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Shell dialect (default: your login shell)
    #[arg(long)]
    shell: Option<String>,

    /// Startup file to edit instead of the shell's default
    #[arg(long, value_name = "FILE")]
    path: Option<PathBuf>,
}

/// Handle shell command
pub fn cmd_shell(
    args: ShellArgs,
    registry: &ShellRegistry,
    quiet: bool,
    verbose: u8,
) -> Result<()> {
    match args.command {
        ShellCommands::Install(target) => cmd_shell_install(&target, registry, quiet),
        ShellCommands::Uninstall(target) => cmd_shell_uninstall(&target, registry, quiet),
        ShellCommands::Source { shell } => cmd_shell_source(shell.as_deref(), registry),
        ShellCommands::Status => cmd_shell_status(registry, quiet, verbose),
    }
}

fn cmd_shell_install(target: &TargetArgs, registry: &ShellRegistry, quiet: bool) -> Result<()> {
    let shell = resolve_shell(target.shell.as_deref(), registry)?;
    let script = registry.get(&shell).map_err(|e| format_shell_error_anyhow(&e))?;
    let path = target_path(target.path.as_deref(), &script.path);

    let bindings = Bindings::for_executable(current_executable()?);
    let rendered = render(script.template, &bindings)
        .with_context(|| format!("Failed to render the {shell} integration script"))?;

    let outcome = BlockEditor::default()
        .install(&path, &rendered)
        .map_err(|e| format_shell_error_anyhow(&e))?;

    if !quiet {
        let message = match outcome {
            InstallOutcome::Created => "Created",
            InstallOutcome::Appended => "Installed into",
            InstallOutcome::Updated => "Updated",
            InstallOutcome::Unchanged => "Already up to date:",
        };
        println!(
            "{} {message} {}",
            style("Success:").green().bold(),
            style(path.display()).cyan()
        );
        if outcome != InstallOutcome::Unchanged {
            println!(
                "Open a new {shell} session or run {} to use it now.",
                style(format!("eval \"$(awscred shell source --shell {shell})\"")).green()
            );
        }
    }

    Ok(())
}

fn cmd_shell_uninstall(target: &TargetArgs, registry: &ShellRegistry, quiet: bool) -> Result<()> {
    let shell = resolve_shell(target.shell.as_deref(), registry)?;
    let script = registry.get(&shell).map_err(|e| format_shell_error_anyhow(&e))?;
    let path = target_path(target.path.as_deref(), &script.path);

    let outcome = BlockEditor::default()
        .uninstall(&path)
        .map_err(|e| format_shell_error_anyhow(&e))?;

    if !quiet {
        match outcome {
            UninstallOutcome::Removed => println!(
                "{} Removed awscred from {}",
                style("Success:").green().bold(),
                style(path.display()).cyan()
            ),
            UninstallOutcome::NotInstalled | UninstallOutcome::FileMissing => println!(
                "{} awscred is not installed in {}",
                style("Note:").cyan(),
                path.display()
            ),
        }
    }

    Ok(())
}

fn cmd_shell_source(shell: Option<&str>, registry: &ShellRegistry) -> Result<()> {
    let shell = resolve_shell(shell, registry)?;
    let script = registry.get(&shell).map_err(|e| format_shell_error_anyhow(&e))?;
    let bindings = Bindings::for_executable(current_executable()?);

    let stdout = std::io::stdout();
    BlockEditor::default()
        .write_to(script.template, &bindings, stdout.lock())
        .map_err(|e| format_shell_error_anyhow(&e))
}

fn cmd_shell_status(registry: &ShellRegistry, quiet: bool, verbose: u8) -> Result<()> {
    if quiet {
        return Ok(());
    }

    let editor = BlockEditor::default();
    let bindings = Bindings::for_executable(current_executable()?);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Shell", "Startup file", "State"]);

    let mut problems = Vec::new();
    for name in registry.names() {
        let script = registry.get(name).map_err(|e| format_shell_error_anyhow(&e))?;
        let expected = render(script.template, &bindings)?;
        let state = match editor.inspect(&script.path) {
            Ok(Some(installed)) => integration_state(&installed, &expected),
            Ok(None) if script.path.exists() => "not installed",
            Ok(None) => "no file",
            Err(e @ ShellError::CorruptedBlock { .. }) => {
                problems.push(e);
                "corrupted"
            }
            Err(e) => return Err(format_shell_error_anyhow(&e)),
        };
        table.add_row(vec![
            name.to_string(),
            script.path.display().to_string(),
            state_style(state).to_string(),
        ]);
    }

    println!("{table}");

    if verbose > 0 {
        for problem in &problems {
            eprintln!();
            eprintln!("{}", format_shell_error(problem));
        }
    } else if !problems.is_empty() {
        eprintln!(
            "{} Run with {} for details on damaged files.",
            style("Note:").yellow(),
            style("-v").green()
        );
    }

    Ok(())
}

/// "installed" when the block matches what install would write now
fn integration_state(installed: &str, expected: &str) -> &'static str {
    if installed.lines().eq(expected.lines()) {
        "installed"
    } else {
        "outdated"
    }
}

/// Shell from the flag, or from the login shell
fn resolve_shell(flag: Option<&str>, registry: &ShellRegistry) -> Result<String> {
    let shell = match flag {
        Some(shell) => shell.to_string(),
        None => {
            let login_shell = std::env::var(SHELL_ENV).ok();
            detect_shell(login_shell.as_deref()).ok_or_else(|| {
                anyhow!("Could not detect your shell from ${SHELL_ENV}; pass --shell")
            })?
        }
    };

    if !registry.contains(&shell) {
        let supported: Vec<&str> = registry.names().collect();
        bail!(
            "Unsupported shell '{shell}'. Supported shells: {}",
            supported.join(", ")
        );
    }

    debug!("using {shell} as our shell");
    Ok(shell)
}

fn target_path(flag: Option<&Path>, default: &Path) -> PathBuf {
    match flag {
        Some(path) => expand_home(path),
        None => default.to_path_buf(),
    }
}

/// Expand a leading `~` using the current user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match awscred_core::config::paths::home_dir() {
        Some(home) => expand_home_with(path, &home),
        None => path.to_path_buf(),
    }
}

fn expand_home_with(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Absolute path of the running binary, as embedded in the scripts
fn current_executable() -> Result<String> {
    let exe = std::env::current_exe().context("Unable to determine the awscred executable path")?;
    let exe = exe
        .to_str()
        .ok_or_else(|| anyhow!("Executable path is not valid UTF-8: {}", exe.display()))?;
    check_embeddable(exe)?;
    Ok(exe.to_string())
}

/// The scripts quote the path with single quotes
fn check_embeddable(exe: &str) -> Result<()> {
    if exe.contains('\'') {
        bail!("Executable path contains a single quote and cannot be embedded in a shell script: {exe}");
    }
    Ok(())
}
