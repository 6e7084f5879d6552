//! Placeholder scrubbing for interviewer-authored text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal that replaces every placeholder span.
pub const PLACEHOLDER_REPLACEMENT: &str = "Interviewer";

// Non-greedy per pair; the first closing bracket ends the match. `.` stops at newlines.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]|<(.*?)>").expect("invalid placeholder regex"));

/// Replaces each `[...]` and `<...>` span with `"Interviewer"`.
///
/// Only ever applied to interviewer turns. Candidate answers, job descriptions
/// and resumes pass through untouched.
pub fn scrub(text: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(text, PLACEHOLDER_REPLACEMENT)
        .into_owned()
}
