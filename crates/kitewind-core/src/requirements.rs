//! Package requirements attached to an app.
//!
//! Users edit requirements as free text, one package per line, with `#`
//! comment lines allowed. The sandbox wants a clean package list; the UI
//! shows the list back sorted.

use serde::{Deserialize, Serialize};

/// Splits requirements text into package names.
///
/// Empty lines and lines starting with `#` are dropped, the rest are trimmed.
/// Filtering happens before trimming, so an indented `#` line is kept and a
/// line of only spaces comes back as an empty string.
pub fn parse_requirements(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Drops blank lines, sorts the rest and joins them with `\n`.
///
/// Duplicate lines are kept.
pub fn normalize_requirements(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// The package list for one app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementsSet(Vec<String>);

impl RequirementsSet {
    pub fn new() -> Self {
        RequirementsSet(Vec::new())
    }

    /// Parses user-edited text with [`parse_requirements`].
    pub fn from_text(text: &str) -> Self {
        let packages = parse_requirements(text)
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        RequirementsSet(packages)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends packages the sandbox installed on its own.
    pub fn extend<I, S>(&mut self, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(
            packages
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.trim().is_empty()),
        );
    }

    /// The sorted, newline-joined text shown to the user.
    pub fn to_text(&self) -> String {
        normalize_requirements(&self.0.join("\n"))
    }
}

impl From<Vec<String>> for RequirementsSet {
    fn from(packages: Vec<String>) -> Self {
        RequirementsSet(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sorts_and_drops_blank_lines() {
        assert_eq!(normalize_requirements("b\na\n\nc"), "a\nb\nc");
    }

    #[test]
    fn normalize_keeps_duplicates() {
        assert_eq!(normalize_requirements("numpy\npandas\nnumpy"), "numpy\nnumpy\npandas");
    }

    #[test]
    fn normalize_of_empty_text_is_empty() {
        assert_eq!(normalize_requirements(""), "");
        assert_eq!(normalize_requirements("\n\n"), "");
    }

    #[test]
    fn parse_filters_comments_and_trims() {
        let parsed = parse_requirements("# plotting\nmatplotlib \n\n  numpy\n#pandas");
        assert_eq!(parsed, vec!["matplotlib".to_string(), "numpy".to_string()]);
    }

    #[test]
    fn parse_keeps_indented_comment() {
        let parsed = parse_requirements("  # not a comment here");
        assert_eq!(parsed, vec!["# not a comment here".to_string()]);
    }

    #[test]
    fn set_renders_sorted_text() {
        let mut set = RequirementsSet::from_text("scipy\n# note\nnumpy\n   \n");
        assert_eq!(set.as_slice(), &["scipy".to_string(), "numpy".to_string()][..]);
        set.extend(["altair", " "]);
        assert_eq!(set.to_text(), "altair\nnumpy\nscipy");
    }
}
