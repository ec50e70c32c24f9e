// ABOUTME: Query interface of the statistics sources consumed on each scrape.
// ABOUTME: Injected as a shared handle; no global lookup.
use crate::StatRecord;

/// Read-only query interface of the connection pool and web statistics
///
/// Reads are expected to be in-memory and non-blocking. Implementations must
/// tolerate concurrent calls if the collector is scraped concurrently.
pub trait StatSource: Send + Sync {
    /// One record per known data source pool
    fn pool_records(&self) -> Vec<StatRecord>;

    /// Identities of the data sources that carry statement statistics
    fn data_source_keys(&self) -> Vec<String>;

    /// Statement records of one data source
    fn statement_records(&self, data_source: &str) -> Vec<StatRecord>;

    /// One record per web request URI
    fn endpoint_records(&self) -> Vec<StatRecord>;
}
