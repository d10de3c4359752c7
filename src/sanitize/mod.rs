//! Fail-soft sanitizers for untrusted email input.
//!
//! Every function in this module always returns a safe value instead of an
//! error. Unrecognized input is neutralized (URLs become `#`, disallowed tags
//! disappear, CSS punctuation is stripped) rather than rejected.

mod css;
mod escape;
mod html;
mod subject;
mod url;

pub use css::{sanitize_css_value, MAX_CSS_VALUE_LEN};
pub use escape::escape_html;
pub use html::filter_tags;
pub use subject::{sanitize_subject, MAX_SUBJECT_LEN};
pub use url::{classify_url, sanitize_url, UrlClassification, UNSAFE_URL_PLACEHOLDER};

/// Truncate a string to at most `max_chars` characters without splitting a
/// multi-byte character.
pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}
