//! Supported shells and the startup files we edit for them
//!
//! The registry is an immutable value built once at startup and handed to
//! whoever needs it, so tests can build their own with temporary paths.

use super::ShellError;
use crate::config::paths;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bundled bash integration script
pub const BASH_PROFILE_SH: &str = include_str!("scripts/bash_profile.sh");
/// Bundled zsh integration script
pub const ZSHRC_SH: &str = include_str!("scripts/zshrc.sh");
/// Bundled fish integration script
pub const AWSCRED_FISH: &str = include_str!("scripts/awscred.fish");

/// A shell's integration template and the file it is installed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellScript {
    pub template: &'static str,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRegistry {
    scripts: BTreeMap<String, ShellScript>,
}

impl ShellRegistry {
    /// Built-in table for bash, zsh and fish
    ///
    /// `home` is the user's home directory and `config_home` the XDG config
    /// directory (`~/.config` unless overridden).
    pub fn builtin(home: &Path, config_home: &Path) -> Self {
        let mut scripts = BTreeMap::new();
        scripts.insert(
            "bash".to_string(),
            ShellScript {
                template: BASH_PROFILE_SH,
                path: home.join(".bash_profile"),
            },
        );
        scripts.insert(
            "zsh".to_string(),
            ShellScript {
                template: ZSHRC_SH,
                path: home.join(".zshrc"),
            },
        );
        scripts.insert(
            "fish".to_string(),
            ShellScript {
                template: AWSCRED_FISH,
                path: config_home
                    .join("fish")
                    .join("completions")
                    .join("awscred.fish"),
            },
        );
        Self { scripts }
    }

    /// Built-in table rooted at the current user's home directory
    ///
    /// Returns None if the home directory cannot be determined.
    pub fn from_env() -> Option<Self> {
        let home = paths::home_dir()?;
        let config_home = paths::config_home()?;
        Some(Self::builtin(&home, &config_home))
    }

    /// Replace the default target file for `shell`
    pub fn with_path_override(
        mut self,
        shell: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Self, ShellError> {
        let script = self
            .scripts
            .get_mut(shell)
            .ok_or_else(|| ShellError::UnsupportedShell(shell.to_string()))?;
        script.path = path.into();
        debug!("{shell} startup file overridden: {}", script.path.display());
        Ok(self)
    }

    pub fn get(&self, shell: &str) -> Result<&ShellScript, ShellError> {
        self.scripts
            .get(shell)
            .ok_or_else(|| ShellError::UnsupportedShell(shell.to_string()))
    }

    pub fn contains(&self, shell: &str) -> bool {
        self.scripts.contains_key(shell)
    }

    /// Supported shell names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }
}

/// Shell name from a login shell path such as the value of `$SHELL`
///
/// `/usr/local/bin/zsh` -> `zsh`. Returns None for an empty value.
pub fn detect_shell(shell_path: Option<&str>) -> Option<String> {
    let shell_path = shell_path?.trim();
    if shell_path.is_empty() {
        return None;
    }
    let name = Path::new(shell_path).file_name()?.to_str()?;
    // Login shells are sometimes reported as "-zsh"
    let name = name.trim_start_matches('-');
    debug!("detected login shell: {name}");
    Some(name.to_string())
}
