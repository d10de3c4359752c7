//! URL protocol allow-listing for links and buttons.

use lazy_static::lazy_static;
use regex::Regex;

/// Replacement for any URL that is not recognized as safe
pub const UNSAFE_URL_PLACEHOLDER: &str = "#";

/// Schemes that are rejected before the allow-list is consulted
const DENIED_SCHEMES: [&str; 5] = ["javascript:", "data:", "vbscript:", "file:", "about:"];

lazy_static! {
    /// Safe URL shapes, tested in order
    static ref SAFE_PATTERNS: [Regex; 5] = [
        Regex::new(r"(?i)^https?://[^\s/?#][^\s]*$").unwrap(),
        Regex::new(r"(?i)^mailto:[^\s]*@[^\s]*$").unwrap(),
        Regex::new(r"(?i)^tel:\+?[0-9\s\-()]+$").unwrap(),
        Regex::new(r"^/[^/\\]").unwrap(),
        Regex::new(r"^#[\w-]+$").unwrap(),
    ];
}

/// Outcome of checking a URL against the allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlClassification {
    /// URL matched an allow-listed shape (carries the trimmed URL)
    Safe(String),
    /// URL was empty, denied, or unrecognized
    Unsafe,
}

impl UrlClassification {
    /// The URL to embed: the trimmed input when safe, `#` otherwise
    pub fn into_url(self) -> String {
        match self {
            UrlClassification::Safe(url) => url,
            UrlClassification::Unsafe => UNSAFE_URL_PLACEHOLDER.to_string(),
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, UrlClassification::Safe(_))
    }
}

/// Classify a candidate URL. Anything not explicitly recognized is unsafe.
pub fn classify_url(url: &str) -> UrlClassification {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return UrlClassification::Unsafe;
    }

    let lowered = trimmed.to_ascii_lowercase();
    if DENIED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return UrlClassification::Unsafe;
    }

    if SAFE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed)) {
        UrlClassification::Safe(trimmed.to_string())
    } else {
        UrlClassification::Unsafe
    }
}

/// Return the URL if it is safe, `#` otherwise.
pub fn sanitize_url(url: &str) -> String {
    let classification = classify_url(url);
    if !classification.is_safe() {
        tracing::debug!(url = %url, "Neutralized unsafe URL");
    }
    classification.into_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "#");
        assert_eq!(sanitize_url("JavaScript:alert(1)"), "#");
        assert_eq!(sanitize_url("  data:text/html;base64,PHNjcmlwdD4="), "#");
        assert_eq!(sanitize_url("vbscript:msgbox"), "#");
        assert_eq!(sanitize_url("file:///etc/passwd"), "#");
        assert_eq!(sanitize_url("about:blank"), "#");
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(sanitize_url(""), "#");
        assert_eq!(sanitize_url("   "), "#");
    }

    #[test]
    fn test_http_urls() {
        assert_eq!(
            sanitize_url("https://example.com/x"),
            "https://example.com/x"
        );
        assert_eq!(sanitize_url("http://example.com"), "http://example.com");
        assert_eq!(
            sanitize_url("  https://example.com/path?q=1  "),
            "https://example.com/path?q=1"
        );
        assert_eq!(sanitize_url("https://"), "#");
    }

    #[test]
    fn test_mailto_and_tel() {
        assert_eq!(
            sanitize_url("mailto:someone@example.com"),
            "mailto:someone@example.com"
        );
        assert_eq!(sanitize_url("mailto:nobody"), "#");
        assert_eq!(sanitize_url("tel:+1 (555) 123-4567"), "tel:+1 (555) 123-4567");
        assert_eq!(sanitize_url("tel:call-me"), "#");
    }

    #[test]
    fn test_relative_and_anchor() {
        assert_eq!(sanitize_url("/account/settings"), "/account/settings");
        assert_eq!(sanitize_url("//evil.example.com"), "#");
        assert_eq!(sanitize_url("/"), "#");
        assert_eq!(sanitize_url("/\\evil.example.com"), "#");
        assert_eq!(classify_url("/\\evil.example.com"), UrlClassification::Unsafe);
        assert_eq!(sanitize_url("#anchor"), "#anchor");
        assert_eq!(sanitize_url("#section-2"), "#section-2");
        assert_eq!(sanitize_url("#"), "#");
    }

    #[test]
    fn test_unrecognized_is_unsafe() {
        assert_eq!(sanitize_url("ftp://example.com"), "#");
        assert_eq!(sanitize_url("example.com"), "#");
        assert_eq!(classify_url("relative/path"), UrlClassification::Unsafe);
    }
}
