//! ABOUTME: Shared testing utilities and helper functions
//! ABOUTME: Stat record fixtures and a fake statistics source for all crates

use dp_core::{StatRecord, StatSource, StatValue};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Zero counts for every latency bucket
pub const EMPTY_BUCKETS: [u64; 7] = [0; 7];

/// Build a record from a JSON object; panics on anything else
pub fn record(value: serde_json::Value) -> StatRecord {
    serde_json::from_value(value).expect("fixture must be a JSON object of stat values")
}

/// Fill every field of `gauges` and `histograms` that `base` lacks with zeros
pub fn filled_record<'a>(
    mut base: StatRecord,
    gauges: impl IntoIterator<Item = &'a str>,
    histograms: impl IntoIterator<Item = &'a str>,
) -> StatRecord {
    for field in gauges {
        if base.get(field).is_none() {
            base.insert(field, 0);
        }
    }
    for field in histograms {
        if base.get(field).is_none() {
            base.insert(field, EMPTY_BUCKETS);
        }
    }
    base
}

/// In-memory statistics source whose contents can change between scrapes
#[derive(Debug, Default)]
pub struct FakeStatSource {
    pools: Mutex<Vec<StatRecord>>,
    statements: Mutex<BTreeMap<String, Vec<StatRecord>>>,
    endpoints: Mutex<Vec<StatRecord>>,
    statement_queries: AtomicUsize,
    endpoint_queries: AtomicUsize,
}

impl FakeStatSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(self, record: StatRecord) -> Self {
        self.pools.lock().unwrap().push(record);
        self
    }

    pub fn with_statement(self, data_source: &str, record: StatRecord) -> Self {
        self.statements
            .lock()
            .unwrap()
            .entry(data_source.to_string())
            .or_default()
            .push(record);
        self
    }

    pub fn with_endpoint(self, record: StatRecord) -> Self {
        self.endpoints.lock().unwrap().push(record);
        self
    }

    /// Replace one field on every pool record
    pub fn set_pool_field(&self, field: &str, value: impl Into<StatValue> + Clone) {
        for record in self.pools.lock().unwrap().iter_mut() {
            record.insert(field, value.clone());
        }
    }

    /// Drop one field from every pool record
    pub fn remove_pool_field(&self, field: &str) {
        for record in self.pools.lock().unwrap().iter_mut() {
            record.remove(field);
        }
    }

    /// How many times statement records were requested
    pub fn statement_queries(&self) -> usize {
        self.statement_queries.load(Ordering::Relaxed)
    }

    /// How many times endpoint records were requested
    pub fn endpoint_queries(&self) -> usize {
        self.endpoint_queries.load(Ordering::Relaxed)
    }
}

impl StatSource for FakeStatSource {
    fn pool_records(&self) -> Vec<StatRecord> {
        self.pools.lock().unwrap().clone()
    }

    fn data_source_keys(&self) -> Vec<String> {
        self.statements.lock().unwrap().keys().cloned().collect()
    }

    fn statement_records(&self, data_source: &str) -> Vec<StatRecord> {
        self.statement_queries.fetch_add(1, Ordering::Relaxed);
        self.statements
            .lock()
            .unwrap()
            .get(data_source)
            .cloned()
            .unwrap_or_default()
    }

    fn endpoint_records(&self) -> Vec<StatRecord> {
        self.endpoint_queries.fetch_add(1, Ordering::Relaxed);
        self.endpoints.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filled_record_keeps_existing_values() {
        let base = record(json!({"Name": "p1", "ActiveCount": 5}));
        let filled = filled_record(base, ["ActiveCount", "PoolingCount"], ["TransactionHistogram"]);

        assert_eq!(filled.get("ActiveCount"), Some(&StatValue::Int(5)));
        assert_eq!(filled.get("PoolingCount"), Some(&StatValue::Int(0)));
        assert_eq!(
            filled.get("TransactionHistogram"),
            Some(&StatValue::Buckets(vec![0; 7]))
        );
    }

    #[test]
    fn test_fake_source_groups_statements_by_data_source() {
        let source = FakeStatSource::new()
            .with_statement("ds-b", record(json!({"Name": "b"})))
            .with_statement("ds-a", record(json!({"Name": "a"})));

        assert_eq!(source.data_source_keys(), ["ds-a", "ds-b"]);
        assert_eq!(source.statement_records("ds-a").len(), 1);
        assert!(source.statement_records("missing").is_empty());
        assert_eq!(source.statement_queries(), 2);
    }
}
