//! Sanitization of untrusted values embedded in inline `style` attributes.

use lazy_static::lazy_static;
use regex::Regex;

use super::truncate_chars;

/// Maximum length (in characters) of a sanitized CSS value
pub const MAX_CSS_VALUE_LEN: usize = 100;

/// Punctuation that could close the declaration, the attribute, or open a
/// function call
const FORBIDDEN_CHARS: [char; 10] = ['"', '\'', '\\', ';', '{', '}', '(', ')', '<', '>'];

/// Constructs that change how a value is interpreted (matched ASCII
/// case-insensitively)
const FORBIDDEN_KEYWORDS: [&str; 4] = ["expression", "javascript:", "data:", "url("];

lazy_static! {
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*.*?(?:\*/|$)").unwrap();
    static ref LINE_COMMENT: Regex = Regex::new(r"//[^\n]*").unwrap();
}

/// Strip everything from `value` that could escape an inline CSS declaration.
///
/// The result never contains quotes, backslashes, semicolons, braces,
/// parentheses or angle brackets, nor the substrings `expression`,
/// `javascript:`, `data:` and `url(`. It is trimmed and at most
/// [`MAX_CSS_VALUE_LEN`] characters long.
pub fn sanitize_css_value(value: &str) -> String {
    let mut current = strip_comments(value);

    // Removing one construct can splice another together ("javajavascript:script:"),
    // so keep going until a pass changes nothing.
    loop {
        let next = strip_chars(&strip_keywords(&current));
        if next == current {
            break;
        }
        current = strip_comments(&next);
    }

    truncate_chars(current.trim(), MAX_CSS_VALUE_LEN)
        .trim_end()
        .to_string()
}

fn strip_comments(value: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(value, "");
    LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
}

fn strip_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect()
}

fn strip_keywords(value: &str) -> String {
    let mut result = value.to_string();
    for keyword in FORBIDDEN_KEYWORDS {
        while let Some(pos) = find_ascii_case_insensitive(&result, keyword) {
            result.replace_range(pos..pos + keyword.len(), "");
        }
    }
    result
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
