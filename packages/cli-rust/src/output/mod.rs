//! Output utilities for CLI commands
//!
//! Styled error messages for library errors and color helpers for
//! integration states.

pub mod colors;
pub mod errors;

pub use colors::state_style;
pub use errors::{format_federation_error_anyhow, format_shell_error, format_shell_error_anyhow};
