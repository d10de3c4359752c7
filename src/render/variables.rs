//! Variable placeholder detection, validation and substitution

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::{RenderError, RenderResult, Variables};

lazy_static! {
    /// `{{ name }}` with optional whitespace on either side of the identifier
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap();
}

/// Distinct placeholder names in order of first appearance
pub fn find_placeholders(markdown: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(markdown) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Check that every placeholder in `markdown` has a value in `variables`
pub fn validate_variables(markdown: &str, variables: &Variables) -> RenderResult<()> {
    let found = find_placeholders(markdown);
    let missing: Vec<String> = found
        .iter()
        .filter(|name| !variables.contains_key(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(RenderError::MissingVariables {
        missing,
        found,
        provided: variables.keys().cloned().collect(),
    })
}

/// Replace {{ name }} placeholders with their values in a single pass.
///
/// Substituted text is never scanned again. Placeholders without a value are
/// left untouched; call [`validate_variables`] first to reject them.
pub fn substitute_variables(markdown: &str, variables: &Variables) -> String {
    PLACEHOLDER
        .replace_all(markdown, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
