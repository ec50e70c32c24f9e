// ABOUTME: Stat records handed over by the statistics sources on each scrape.
// ABOUTME: Typed accessors turn shape mismatches into collaborator contract errors.
use crate::{to_rfc3339, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// One value of a stat record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Null,
    Int(i64),
    Float(f64),
    Buckets(Vec<u64>),
    Timestamp(SystemTime),
    Text(String),
}

impl StatValue {
    /// Short shape name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StatValue::Null => "null",
            StatValue::Int(_) => "integer",
            StatValue::Float(_) => "float",
            StatValue::Buckets(_) => "buckets",
            StatValue::Timestamp(_) => "timestamp",
            StatValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Null => write!(f, "null"),
            StatValue::Int(v) => write!(f, "integer {}", v),
            StatValue::Float(v) => write!(f, "float {}", v),
            StatValue::Buckets(v) => write!(f, "buckets {:?}", v),
            StatValue::Timestamp(t) => write!(f, "timestamp {}", to_rfc3339(*t)),
            StatValue::Text(s) => write!(f, "text {:?}", s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Int(v)
    }
}

impl From<i32> for StatValue {
    fn from(v: i32) -> Self {
        StatValue::Int(v.into())
    }
}

impl From<u32> for StatValue {
    fn from(v: u32) -> Self {
        StatValue::Int(v.into())
    }
}

impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => StatValue::Int(v),
            Err(_) => StatValue::Float(v as f64),
        }
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<Vec<u64>> for StatValue {
    fn from(v: Vec<u64>) -> Self {
        StatValue::Buckets(v)
    }
}

impl<const N: usize> From<[u64; N]> for StatValue {
    fn from(v: [u64; N]) -> Self {
        StatValue::Buckets(v.to_vec())
    }
}

impl From<SystemTime> for StatValue {
    fn from(v: SystemTime) -> Self {
        StatValue::Timestamp(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        StatValue::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

impl<T: Into<StatValue>> From<Option<T>> for StatValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(StatValue::Null, Into::into)
    }
}

/// Field name to value mapping describing one pool, statement or endpoint
///
/// `group` arguments on the accessors only name the record kind in errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatRecord {
    fields: BTreeMap<String, StatValue>,
}

impl StatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<StatValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<StatValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&StatValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, group: &'static str, field: &str) -> Result<&StatValue> {
        self.fields.get(field).ok_or_else(|| Error::MissingField {
            group,
            field: field.to_string(),
        })
    }

    /// Numeric field coerced to floating point
    pub fn number(&self, group: &'static str, field: &str) -> Result<f64> {
        match self.require(group, field)? {
            StatValue::Int(v) => Ok(*v as f64),
            StatValue::Float(v) => Ok(*v),
            other => Err(type_error(group, field, "number", other)),
        }
    }

    /// Latency bucket counts
    pub fn buckets(&self, group: &'static str, field: &str) -> Result<&[u64]> {
        match self.require(group, field)? {
            StatValue::Buckets(v) => Ok(v),
            other => Err(type_error(group, field, "buckets", other)),
        }
    }

    /// Required text field
    pub fn text(&self, group: &'static str, field: &str) -> Result<&str> {
        match self.require(group, field)? {
            StatValue::Text(s) => Ok(s),
            other => Err(type_error(group, field, "text", other)),
        }
    }

    /// Text field that may be absent or null
    pub fn optional_text(&self, group: &'static str, field: &str) -> Result<Option<&str>> {
        match self.fields.get(field) {
            None | Some(StatValue::Null) => Ok(None),
            Some(StatValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(type_error(group, field, "text", other)),
        }
    }

    /// Timestamp field that may be absent or null
    pub fn optional_timestamp(
        &self,
        group: &'static str,
        field: &str,
    ) -> Result<Option<SystemTime>> {
        match self.fields.get(field) {
            None | Some(StatValue::Null) => Ok(None),
            Some(StatValue::Timestamp(t)) => Ok(Some(*t)),
            Some(other) => Err(type_error(group, field, "timestamp", other)),
        }
    }
}

impl<K: Into<String>, V: Into<StatValue>> FromIterator<(K, V)> for StatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = StatRecord::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

fn type_error(group: &'static str, field: &str, expected: &'static str, found: &StatValue) -> Error {
    Error::FieldType {
        group,
        field: field.to_string(),
        expected,
        found: found.to_string(),
    }
}
