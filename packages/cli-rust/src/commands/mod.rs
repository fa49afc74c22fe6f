//! CLI command implementations

mod config;
mod shell;
mod web_console;

pub use config::{ConfigArgs, cmd_config};
pub use shell::{ShellArgs, cmd_shell, expand_home};
pub use web_console::{ConsoleArgs, cmd_console};
