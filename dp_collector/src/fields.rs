//! Declarative table of every metric the collector exposes.
//!
//! One row per stat field. The scrape orchestrator walks this table in order,
//! so the row order here is the family order of every snapshot.

/// Statistic group a record (and its metric families) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatGroup {
    /// One record per data source connection pool
    Pool,
    /// One record per distinct SQL statement, across all data sources
    Statement,
    /// One record per web request URI
    Endpoint,
}

impl StatGroup {
    pub const ALL: [StatGroup; 3] = [StatGroup::Pool, StatGroup::Statement, StatGroup::Endpoint];

    pub fn prefix(self) -> &'static str {
        match self {
            StatGroup::Pool => "druid_",
            StatGroup::Statement => "druid_sql_",
            StatGroup::Endpoint => "druid_uri_",
        }
    }

    pub fn help_prefix(self) -> &'static str {
        match self {
            StatGroup::Pool => "Druid",
            StatGroup::Statement => "Druid SQL",
            StatGroup::Endpoint => "Druid URI",
        }
    }

    /// Name used for this group in errors and log fields
    pub fn as_str(self) -> &'static str {
        match self {
            StatGroup::Pool => "pool",
            StatGroup::Statement => "sql",
            StatGroup::Endpoint => "uri",
        }
    }
}

/// Shape of the family built from a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One sample per record
    Gauge,
    /// One sample per record and latency bucket
    Histogram,
    /// One sample per record that has a recorded error, valued at its epoch millis
    ErrorGauge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricField {
    pub name: &'static str,
    pub group: StatGroup,
    pub kind: FieldKind,
}

const fn gauge(group: StatGroup, name: &'static str) -> MetricField {
    MetricField {
        name,
        group,
        kind: FieldKind::Gauge,
    }
}

const fn histogram(group: StatGroup, name: &'static str) -> MetricField {
    MetricField {
        name,
        group,
        kind: FieldKind::Histogram,
    }
}

use FieldKind::ErrorGauge;
use StatGroup::{Endpoint, Pool, Statement};

pub const METRIC_FIELDS: &[MetricField] = &[
    gauge(Pool, "WaitThreadCount"),
    gauge(Pool, "NotEmptyWaitCount"),
    gauge(Pool, "NotEmptyWaitMillis"),
    gauge(Pool, "PoolingCount"),
    gauge(Pool, "PoolingPeak"),
    gauge(Pool, "ActiveCount"),
    gauge(Pool, "ActivePeak"),
    gauge(Pool, "InitialSize"),
    gauge(Pool, "MinIdle"),
    gauge(Pool, "MaxActive"),
    gauge(Pool, "QueryTimeout"),
    gauge(Pool, "TransactionQueryTimeout"),
    gauge(Pool, "LoginTimeout"),
    gauge(Pool, "LogicConnectCount"),
    gauge(Pool, "LogicCloseCount"),
    gauge(Pool, "LogicConnectErrorCount"),
    gauge(Pool, "PhysicalConnectCount"),
    gauge(Pool, "PhysicalCloseCount"),
    gauge(Pool, "PhysicalConnectErrorCount"),
    gauge(Pool, "ExecuteCount"),
    gauge(Pool, "ErrorCount"),
    gauge(Pool, "CommitCount"),
    gauge(Pool, "RollbackCount"),
    gauge(Pool, "PSCacheAccessCount"),
    gauge(Pool, "PSCacheHitCount"),
    gauge(Pool, "PSCacheMissCount"),
    gauge(Pool, "StartTransactionCount"),
    gauge(Pool, "ClobOpenCount"),
    gauge(Pool, "BlobOpenCount"),
    gauge(Pool, "KeepAliveCheckCount"),
    gauge(Pool, "MaxWait"),
    gauge(Pool, "MaxWaitThreadCount"),
    gauge(Pool, "MaxPoolPreparedStatementPerConnectionSize"),
    gauge(Pool, "RecycleErrorCount"),
    gauge(Pool, "PreparedStatementOpenCount"),
    gauge(Pool, "PreparedStatementClosedCount"),
    gauge(Pool, "ExecuteUpdateCount"),
    gauge(Pool, "ExecuteQueryCount"),
    gauge(Pool, "ExecuteBatchCount"),
    histogram(Pool, "TransactionHistogram"),
    histogram(Pool, "ConnectionHoldTimeHistogram"),
    gauge(Statement, "ExecuteCount"),
    gauge(Statement, "FetchRowCount"),
    gauge(Statement, "TotalTime"),
    gauge(Statement, "MaxTimespan"),
    gauge(Statement, "RunningCount"),
    gauge(Statement, "ErrorCount"),
    gauge(Statement, "ConcurrentMax"),
    histogram(Statement, "Histogram"),
    histogram(Statement, "FetchRowCountHistogram"),
    histogram(Statement, "EffectedRowCountHistogram"),
    histogram(Statement, "ExecuteAndResultHoldTimeHistogram"),
    MetricField {
        name: "LastErrorTime",
        group: Statement,
        kind: ErrorGauge,
    },
    gauge(Endpoint, "RequestCount"),
    gauge(Endpoint, "RequestTimeMillisMax"),
    gauge(Endpoint, "RequestTimeMillis"),
    gauge(Endpoint, "RunningCount"),
    gauge(Endpoint, "ConcurrentMax"),
    gauge(Endpoint, "JdbcExecuteTimeMillis"),
    gauge(Endpoint, "JdbcExecuteCount"),
    gauge(Endpoint, "JdbcExecuteErrorCount"),
    histogram(Endpoint, "Histogram"),
];

/// Rows of one group, in table order
pub fn fields_of(group: StatGroup) -> impl Iterator<Item = &'static MetricField> {
    METRIC_FIELDS.iter().filter(move |f| f.group == group)
}

/// Number of families a group contributes to each snapshot
pub fn family_count(group: StatGroup) -> usize {
    fields_of(group).count()
}
