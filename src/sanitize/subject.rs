use super::truncate_chars;

/// Maximum subject length in characters
pub const MAX_SUBJECT_LEN: usize = 255;

/// Remove header-injection characters from an email subject and bound its length.
///
/// Carriage returns, line feeds and tabs are deleted (not replaced).
pub fn sanitize_subject(subject: &str) -> String {
    let cleaned: String = subject
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect();

    truncate_chars(&cleaned, MAX_SUBJECT_LEN).to_string()
}
