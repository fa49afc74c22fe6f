//! Shell startup file integration
//!
//! This module provides:
//! - Placeholder rendering for the bundled per-shell scripts
//! - The managed block editor that installs, updates and removes the
//!   generated script inside a user's startup file
//! - The registry of supported shells and their default startup files

mod block;
mod error;
pub mod registry;
pub mod template;

pub use block::{
    BLOCK_END_MARKER, BLOCK_START_MARKER, BlockEditor, BlockMarkers, InstallOutcome,
    UninstallOutcome,
};
pub use error::{BlockDefect, ShellError};
pub use registry::{ShellRegistry, ShellScript, detect_shell};
pub use template::{Bindings, EXECUTABLE_PLACEHOLDER, render};
