//! Color utilities for CLI output
//!
//! Consistent styling for shell integration states.

use console::{Style, StyledObject};

/// Style an integration state string
///
/// - "installed" -> green bold
/// - "corrupted" -> red
/// - "outdated" -> yellow
/// - other -> dim
pub fn state_style(state: &str) -> StyledObject<String> {
    let style = match state {
        "installed" => Style::new().green().bold(),
        "corrupted" => Style::new().red(),
        "outdated" => Style::new().yellow(),
        _ => Style::new().dim(),
    };
    style.apply_to(state.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_style_keeps_text() {
        for state in ["installed", "corrupted", "outdated", "not installed", "no file"] {
            assert_eq!(state_style(state).to_string(), state);
        }
    }
}
