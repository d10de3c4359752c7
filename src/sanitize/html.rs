//! Coarse allow-list tag filter.
//!
//! This is not a DOM sanitizer: tags outside the allow-list are removed, the
//! text between them is kept, and attributes on allowed tags are left alone.

use std::borrow::Cow;
use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Comments, doctype/declarations and processing instructions
    static ref MARKUP_DECLARATION: Regex =
        Regex::new(r"(?s)<!--.*?-->|<![^>]*>|<\?.*?(?:\?>|$)").unwrap();

    /// Opening, closing and self-closing element tags. The name runs up to
    /// whitespace, `/` or `>` the way browsers tokenize it, so `x:y` or
    /// `p_x` is one name.
    static ref ELEMENT_TAG: Regex =
        Regex::new(r#"</?([A-Za-z][^\s/>]*)(?:[\s/](?:"[^"]*"|'[^']*'|[^>])*)?>"#).unwrap();
}

/// Remove every tag whose name is not in `allowed_tags` (case-insensitive).
///
/// An empty allow-list removes all tags. Filtering is repeated until the output
/// is stable, so running the filter on its own output changes nothing.
pub fn filter_tags<S: AsRef<str>>(html: &str, allowed_tags: &[S]) -> String {
    let allowed: HashSet<String> = allowed_tags
        .iter()
        .map(|tag| tag.as_ref().trim().to_ascii_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    let mut current = html.to_string();
    loop {
        let next = filter_once(&current, &allowed);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn filter_once(html: &str, allowed: &HashSet<String>) -> String {
    let without_declarations = MARKUP_DECLARATION.replace_all(html, "");

    let filtered: Cow<'_, str> = ELEMENT_TAG.replace_all(&without_declarations, |caps: &Captures| {
        let name = caps[1].to_ascii_lowercase();
        if allowed.contains(&name) {
            caps[0].to_string()
        } else {
            String::new()
        }
    });

    filtered.into_owned()
}
