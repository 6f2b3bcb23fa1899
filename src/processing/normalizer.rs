//! Whitespace and encoding cleanup applied before any extraction

use regex::Regex;
use std::sync::OnceLock;

pub struct TextNormalizer {
    carriage_return_regex: Regex,
    horizontal_space_regex: Regex,
    newline_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let carriage_return_regex = Regex::new(r"\r\n?").expect("Invalid carriage return regex");
        let horizontal_space_regex = Regex::new(r"[ \t]+").expect("Invalid horizontal space regex");
        let newline_regex = Regex::new(r"\n+").expect("Invalid newline regex");

        Self {
            carriage_return_regex,
            horizontal_space_regex,
            newline_regex,
        }
    }

    /// Replace non-breaking spaces, collapse space and newline runs, trim.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = text.replace('\u{a0}', " ");
        let cleaned = self.carriage_return_regex.replace_all(&cleaned, "\n");
        let cleaned = self.horizontal_space_regex.replace_all(&cleaned, " ");
        let cleaned = self.newline_regex.replace_all(&cleaned, "\n");
        cleaned.trim().to_string()
    }
}

/// Normalize with a shared, lazily built normalizer
pub fn normalize(text: &str) -> String {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::new).normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(normalize("Rust  \t and\u{a0}\u{a0}Python"), "Rust and Python");
    }

    #[test]
    fn test_collapses_newline_runs() {
        assert_eq!(normalize("Skills:\n\n\nRust\n\nGo"), "Skills:\nRust\nGo");
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(normalize("Skills\r\n\r\nRust\rGo"), "Skills\nRust\nGo");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(normalize("  \n Experience \n "), "Experience");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n\u{a0}"), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize("A  b\n\n c \u{a0}d\r\n");
        assert_eq!(normalize(&once), once);
    }
}
