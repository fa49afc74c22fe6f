//! awscred console - open the AWS web console with temporary credentials

use crate::clipboard::copy_to_clipboard;
use crate::constants::{ACCESS_KEY_ID_ENV, DURATION_ENV, SECRET_ACCESS_KEY_ENV, SESSION_TOKEN_ENV};
use crate::output::format_federation_error_anyhow;
use anyhow::{Result, anyhow, bail};
use awscred_core::Config;
use awscred_core::config::validate_duration_minutes;
use awscred_core::federation::{Credentials, FederationClient};
use clap::Args;
use console::style;
use std::process::Command;
use tracing::debug;

/// Arguments for the console command
#[derive(Args, Default)]
pub struct ConsoleArgs {
    /// Access key id of the temporary credentials
    #[arg(long, env = ACCESS_KEY_ID_ENV, hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Secret access key of the temporary credentials
    #[arg(long, env = SECRET_ACCESS_KEY_ENV, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Session token of the temporary credentials
    #[arg(long, env = SESSION_TOKEN_ENV, hide_env_values = true)]
    pub session_token: Option<String>,

    /// Console session duration in minutes (default from config: 60)
    #[arg(short, long, env = DURATION_ENV)]
    pub duration: Option<u32>,

    /// Print the URL instead of opening it
    #[arg(short, long, conflicts_with = "clipboard")]
    pub print: bool,

    /// Copy the URL to the clipboard instead of opening it
    #[arg(short, long)]
    pub clipboard: bool,

    /// Browser command to open the URL with
    #[arg(long)]
    pub browser: Option<String>,

    /// Issuer shown by the console sign-in page
    #[arg(long)]
    pub issuer: Option<String>,

    /// Console page to open after signing in
    #[arg(long)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delivery {
    Print,
    Clipboard,
    Browser(Option<String>),
}

pub fn cmd_console(args: &ConsoleArgs, config: &Config, quiet: bool) -> Result<()> {
    let credentials = credentials_from_args(args)?;

    let minutes = args.duration.unwrap_or(config.console_duration_minutes);
    validate_duration_minutes(minutes).map_err(|msg| anyhow!(msg))?;

    let issuer = args.issuer.as_deref().unwrap_or(&config.console_issuer);
    let destination = args
        .destination
        .as_deref()
        .unwrap_or(&config.console_destination);

    let client = FederationClient::with_endpoint(&config.federation_endpoint);
    let rt = tokio::runtime::Runtime::new()?;
    let url = rt
        .block_on(client.console_url(
            &credentials,
            u64::from(minutes) * 60,
            destination,
            issuer,
        ))
        .map_err(|e| format_federation_error_anyhow(&e))?;

    deliver(&url, &delivery(args, config), quiet)
}

fn credentials_from_args(args: &ConsoleArgs) -> Result<Credentials> {
    let access_key_id = required(&args.access_key_id, "--access-key-id", ACCESS_KEY_ID_ENV)?;
    let secret_access_key = required(
        &args.secret_access_key,
        "--secret-access-key",
        SECRET_ACCESS_KEY_ENV,
    )?;
    let session_token = required(&args.session_token, "--session-token", SESSION_TOKEN_ENV)?;
    Ok(Credentials::new(
        access_key_id,
        secret_access_key,
        session_token,
    ))
}

fn required<'a>(value: &'a Option<String>, flag: &str, env: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("Missing temporary credentials: pass {flag} or set {env}"),
    }
}

fn delivery(args: &ConsoleArgs, config: &Config) -> Delivery {
    if args.print {
        Delivery::Print
    } else if args.clipboard {
        Delivery::Clipboard
    } else {
        let browser = args
            .browser
            .clone()
            .or_else(|| config.browser.clone())
            .filter(|b| !b.trim().is_empty());
        Delivery::Browser(browser)
    }
}

fn deliver(url: &str, delivery: &Delivery, quiet: bool) -> Result<()> {
    match delivery {
        Delivery::Print => {
            println!("Please open the following URL in your browser:\n\n{url}\n");
        }
        Delivery::Clipboard => {
            copy_to_clipboard(url)?;
            if !quiet {
                println!(
                    "{} Console URL copied to clipboard",
                    style("Success:").green().bold()
                );
            }
        }
        Delivery::Browser(None) => {
            debug!("opening console URL in the default browser");
            webbrowser::open(url)
                .map_err(|e| anyhow!("Unable to open the console URL in the default browser: {e}"))?;
        }
        Delivery::Browser(Some(browser)) => {
            debug!("opening console URL with {browser}");
            Command::new(browser)
                .arg(url)
                .spawn()
                .map_err(|e| anyhow!("Unable to open the console URL with {browser}: {e}"))?;
        }
    }
    Ok(())
}
