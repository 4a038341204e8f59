//! Entry parser for uploaded address lists
//!
//! One directive per line; blank lines and `#` comments are skipped.
//! Malformed content is not the parser's problem: every surviving line is
//! handed to the validator as-is.

/// Iterate the candidate entry lines of an uploaded file.
///
/// Lines are trimmed; empty lines and lines whose first character is `#`
/// are dropped. Lazy, single pass.
pub fn candidate_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
