//! Free-text label values.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn whitespace_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapse every maximal whitespace run to a single space.
///
/// Leading and trailing runs are collapsed, not trimmed.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let runs = whitespace_runs();
    let needs_rewrite = runs.find_iter(text).any(|m| m.as_str() != " ");
    if needs_rewrite {
        runs.replace_all(text, " ")
    } else {
        Cow::Borrowed(text)
    }
}
