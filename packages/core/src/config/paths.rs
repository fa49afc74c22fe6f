//! Filesystem locations for awscred
//!
//! Config lives under `${XDG_CONFIG_HOME:-$HOME/.config}/awscred` on every
//! platform, matching where the fish integration script goes.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "awscred";
const CONFIG_FILE: &str = "config.json";

/// The current user's home directory
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// `$XDG_CONFIG_HOME`, or `~/.config` when unset
pub fn config_home() -> Option<PathBuf> {
    let xdg = std::env::var("XDG_CONFIG_HOME").ok();
    let home = home_dir()?;
    Some(resolve_config_home(xdg.as_deref(), &home))
}

/// XDG config base from an optional `XDG_CONFIG_HOME` value
///
/// Relative or empty values are ignored, per the XDG base directory rules.
pub fn resolve_config_home(xdg_config_home: Option<&str>, home: &Path) -> PathBuf {
    match xdg_config_home {
        Some(value) if !value.is_empty() && Path::new(value).is_absolute() => PathBuf::from(value),
        _ => home.join(".config"),
    }
}

/// Directory holding the awscred config file
pub fn get_config_dir() -> Option<PathBuf> {
    config_home().map(|base| base.join(APP_DIR))
}

/// Full path of `config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_config_home_wins_when_absolute() {
        let home = Path::new("/home/u");
        assert_eq!(
            resolve_config_home(Some("/xdg"), home),
            PathBuf::from("/xdg")
        );
    }

    #[test]
    fn relative_or_empty_xdg_falls_back_to_dot_config() {
        let home = Path::new("/home/u");
        assert_eq!(
            resolve_config_home(Some("relative/dir"), home),
            PathBuf::from("/home/u/.config")
        );
        assert_eq!(
            resolve_config_home(Some(""), home),
            PathBuf::from("/home/u/.config")
        );
        assert_eq!(resolve_config_home(None, home), PathBuf::from("/home/u/.config"));
    }

    #[test]
    fn config_path_ends_with_app_file() {
        if let Some(path) = get_config_path() {
            assert!(path.ends_with("awscred/config.json"));
        }
    }
}
