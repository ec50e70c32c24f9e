//! Metric names and help text derived from stat field names.

use crate::fields::{FieldKind, StatGroup};

/// Convert a mixed-case field name to lowercase snake case.
///
/// Splits only where a lowercase letter is followed by an uppercase one, so
/// acronyms stay glued to the next word (`PSCacheHitCount` becomes
/// `pscache_hit_count`).
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let mut prev_lower = false;

    for c in name.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// Full family name, e.g. `druid_sql_fetch_row_count_histogram_bucket`
pub fn metric_name(group: StatGroup, kind: FieldKind, field: &str) -> String {
    let mut name = format!("{}{}", group.prefix(), snake_case(field));
    if kind == FieldKind::Histogram {
        name.push_str("_bucket");
    }
    name
}

/// One-line help text, e.g. `Druid SQL ExecuteCount`
pub fn help_text(group: StatGroup, field: &str) -> String {
    format!("{} {}", group.help_prefix(), field)
}
