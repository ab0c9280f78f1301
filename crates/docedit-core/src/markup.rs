//! Inline markup handling
//!
//! Field text may carry `**bold**` delimiters. The output format has no
//! emphasis, so the serializer strips them before emitting text.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
}

/// Replace every `**text**` with `text`
pub fn strip_bold(text: &str) -> Cow<'_, str> {
    BOLD.replace_all(text, "$1")
}

/// Split text on line breaks, dropping blank lines
pub fn visible_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bold_single() {
        assert_eq!(strip_bold("pay **INR 100** now"), "pay INR 100 now");
    }

    #[test]
    fn test_strip_bold_multiple_spans() {
        assert_eq!(
            strip_bold("**SwipeGen** and **DSCASC** agree"),
            "SwipeGen and DSCASC agree"
        );
    }

    #[test]
    fn test_strip_bold_leaves_unpaired_markers() {
        assert_eq!(strip_bold("a ** b"), "a ** b");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(strip_bold("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_visible_lines_skip_blank() {
        let lines: Vec<&str> = visible_lines("one\n\ntwo\n   \nthree").collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }
}
