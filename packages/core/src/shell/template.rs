//! Placeholder substitution for bundled shell scripts
//!
//! Templates mark substitution points as `{{ name }}`. This is
//! not a template engine: there are no conditionals, loops or filters, only
//! named values.

use super::ShellError;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Placeholder name for the absolute path of the running executable
pub const EXECUTABLE_PLACEHOLDER: &str = "executable";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Values substituted into a template, keyed by placeholder name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings with only the executable path set
    pub fn for_executable(path: impl Into<String>) -> Self {
        Self::new().with(EXECUTABLE_PLACEHOLDER, path)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute every placeholder in `template`
///
/// Fails on the first placeholder without a binding. Substituted values are
/// inserted verbatim and never scanned for placeholders themselves.
pub fn render(template: &str, bindings: &Bindings) -> Result<String, ShellError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let value = lookup(&caps, bindings)?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}

/// Names of all placeholders referenced by `template`, in order of first use
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str())
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}

fn lookup<'b>(caps: &Captures<'_>, bindings: &'b Bindings) -> Result<&'b str, ShellError> {
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    bindings.get(name).ok_or_else(|| ShellError::MissingBinding {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_all_placeholders() {
        let template = "complete -C {{ executable }} awscred\nalias x='{{executable}} run'\n";
        let rendered = render(template, &Bindings::for_executable("/usr/local/bin/awscred"))
            .expect("render");
        assert_eq!(
            rendered,
            "complete -C /usr/local/bin/awscred awscred\nalias x='/usr/local/bin/awscred run'\n"
        );
        assert!(!PLACEHOLDER.is_match(&rendered));
    }

    #[test]
    fn render_reports_missing_binding_by_name() {
        let template = "{{ executable }} --profile {{ profile }}";
        let err = render(template, &Bindings::for_executable("/bin/awscred"))
            .expect_err("profile is unbound");
        match err {
            ShellError::MissingBinding { name } => assert_eq!(name, "profile"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let bindings = Bindings::for_executable("{{ executable }}");
        let rendered = render("run {{ executable }}", &bindings).expect("render");
        assert_eq!(rendered, "run {{ executable }}");
    }

    #[test]
    fn render_ignores_extra_bindings_and_plain_braces() {
        let bindings = Bindings::new().with("unused", "x");
        let template = "fn() { echo ${HOME}; }\n";
        assert_eq!(render(template, &bindings).expect("render"), template);
    }

    #[test]
    fn placeholders_are_listed_once_in_order() {
        let template = "{{ b }} {{a}} {{ b }}";
        assert_eq!(placeholders(template), vec!["b", "a"]);
    }
}
