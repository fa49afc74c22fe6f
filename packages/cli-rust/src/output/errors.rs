//! Centralized error formatting
//!
//! Turns library errors into styled, actionable messages for the terminal.

use anyhow::anyhow;
use awscred_core::federation::FederationError;
use awscred_core::shell::{BLOCK_END_MARKER, BLOCK_START_MARKER, ShellError};
use console::style;

/// Format shell integration errors with guidance on how to recover
pub fn format_shell_error(e: &ShellError) -> String {
    match e {
        ShellError::CorruptedBlock { path, line, defect } => {
            format!(
                "{}\n\n  {}\n  {}\n\n  {}\n  {}\n  {}",
                style("Managed block is damaged").red().bold(),
                format_args!("{} (line {line}): {defect}", path.display()),
                style("The file was not modified.").dim(),
                "Open the file and make sure it contains exactly one pair of marker lines:",
                style(format!("  {BLOCK_START_MARKER}")).cyan(),
                style(format!("  {BLOCK_END_MARKER}")).cyan(),
            )
        }
        ShellError::Io { path, source }
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            format!(
                "{}\n\n  {}\n  {}",
                style("Permission denied").red().bold(),
                path.display(),
                style("  Check: ls -l on the file and its directory").cyan(),
            )
        }
        ShellError::UnsupportedShell(shell) => {
            format!(
                "{}\n\n  {}",
                style(format!("Unsupported shell: {shell}")).red().bold(),
                style("  Try: awscred shell install --shell <bash|zsh|fish>").cyan(),
            )
        }
        _ => e.to_string(),
    }
}

/// Format shell errors as anyhow::Error
pub fn format_shell_error_anyhow(e: &ShellError) -> anyhow::Error {
    anyhow!("{}", format_shell_error(e))
}

/// Format federation errors with guidance
pub fn format_federation_error(e: &FederationError) -> String {
    match e {
        FederationError::Network(msg) => {
            format!(
                "{}\n\n  {}\n\n  {}",
                style("Unable to sign in to the AWS console").red().bold(),
                msg,
                "Check your network connection; the request is not retried.",
            )
        }
        FederationError::BadResponse(msg) => {
            format!(
                "{}\n\n  {}\n\n  {}",
                style("AWS did not return a sign-in token").red().bold(),
                msg,
                "Your credentials may be expired or not temporary (session token required).",
            )
        }
    }
}

/// Format federation errors as anyhow::Error
pub fn format_federation_error_anyhow(e: &FederationError) -> anyhow::Error {
    anyhow!("{}", format_federation_error(e))
}
