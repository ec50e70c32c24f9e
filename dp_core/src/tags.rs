// ABOUTME: Static label set attached to every produced sample.
// ABOUTME: Validates tag keys against Prometheus label-name rules at construction.
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Label names produced by the collector itself; tags may not shadow them
pub const DIMENSION_LABELS: [&str; 6] = ["pool", "sql", "le", "class", "message", "uri"];

fn label_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("static regex"))
}

/// Check a single tag key, returning a human readable reason on failure
pub fn check_tag_key(key: &str) -> std::result::Result<(), String> {
    if !label_name_pattern().is_match(key) {
        return Err(format!("tag key {:?} is not a valid label name", key));
    }
    if key.starts_with("__") {
        return Err(format!("tag key {:?} uses the reserved __ prefix", key));
    }
    if DIMENSION_LABELS.contains(&key) {
        return Err(format!("tag key {:?} collides with a collector label", key));
    }
    Ok(())
}

/// Ordered static tags, fixed for the collector's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    keys: Vec<String>,
    values: Vec<String>,
}

impl TagSet {
    /// Build a tag set, keeping the iteration order of `tags`
    pub fn new<I, K, V>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = TagSet::default();
        let mut seen = HashSet::new();

        for (key, value) in tags {
            let key = key.into();
            check_tag_key(&key).map_err(Error::Config)?;
            if !seen.insert(key.clone()) {
                return Err(Error::Config(format!("duplicate tag key {:?}", key)));
            }
            set.keys.push(key);
            set.values.push(value.into());
        }

        Ok(set)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
