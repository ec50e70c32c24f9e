//! Access to the statistics sources, gated by the group enable flags.

use crate::fields::StatGroup;
pub use dp_core::StatSource;
use dp_core::StatRecord;
use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Group enable flags
///
/// Pool statistics are fixed at construction; statement and endpoint
/// statistics can be toggled at runtime and are read once per scrape.
/// Clones share the same toggles.
#[derive(Clone)]
pub struct EnableFlags {
    pool: bool,
    statement: Arc<AtomicBool>,
    endpoint: Arc<AtomicBool>,
}

impl EnableFlags {
    pub fn new(pool: bool, statement: bool, endpoint: bool) -> Self {
        Self {
            pool,
            statement: Arc::new(AtomicBool::new(statement)),
            endpoint: Arc::new(AtomicBool::new(endpoint)),
        }
    }

    pub fn is_enabled(&self, group: StatGroup) -> bool {
        match group {
            StatGroup::Pool => self.pool,
            StatGroup::Statement => self.statement.load(Ordering::Relaxed),
            StatGroup::Endpoint => self.endpoint.load(Ordering::Relaxed),
        }
    }

    /// Toggle a runtime group; the pool group cannot be changed after construction
    pub fn set_enabled(&self, group: StatGroup, enabled: bool) {
        match group {
            StatGroup::Pool => {
                tracing::warn!("Pool statistics cannot be toggled at runtime");
            }
            StatGroup::Statement => self.statement.store(enabled, Ordering::Relaxed),
            StatGroup::Endpoint => self.endpoint.store(enabled, Ordering::Relaxed),
        }
    }
}

impl Default for EnableFlags {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

impl fmt::Debug for EnableFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnableFlags")
            .field("pool", &self.pool)
            .field("statement", &self.is_enabled(StatGroup::Statement))
            .field("endpoint", &self.is_enabled(StatGroup::Endpoint))
            .finish()
    }
}

/// Records of all groups for one scrape
#[derive(Debug, Default)]
pub struct ScrapeRecords {
    pub pool: Vec<StatRecord>,
    pub statement: Vec<StatRecord>,
    pub endpoint: Vec<StatRecord>,
    /// Flag values observed when the records were fetched
    pub statement_enabled: bool,
    pub endpoint_enabled: bool,
}

impl ScrapeRecords {
    pub fn records(&self, group: StatGroup) -> &[StatRecord] {
        match group {
            StatGroup::Pool => &self.pool,
            StatGroup::Statement => &self.statement,
            StatGroup::Endpoint => &self.endpoint,
        }
    }

    pub fn is_enabled(&self, group: StatGroup) -> bool {
        match group {
            StatGroup::Pool => true,
            StatGroup::Statement => self.statement_enabled,
            StatGroup::Endpoint => self.endpoint_enabled,
        }
    }
}

/// Pulls current record lists from an injected [`StatSource`]
#[derive(Clone)]
pub struct StatSourceAdapter {
    source: Arc<dyn StatSource>,
    flags: EnableFlags,
}

impl StatSourceAdapter {
    pub fn new(source: Arc<dyn StatSource>, flags: EnableFlags) -> Self {
        Self { source, flags }
    }

    pub fn flags(&self) -> &EnableFlags {
        &self.flags
    }

    /// Fetch every group with one consistent read of the enable flags
    pub fn fetch(&self) -> ScrapeRecords {
        let pool = self.source.pool_records();

        let statement_enabled = self.flags.is_enabled(StatGroup::Statement);
        let endpoint_enabled = self.flags.is_enabled(StatGroup::Endpoint);

        let statement = if statement_enabled {
            self.all_statement_records()
        } else {
            Vec::new()
        };
        let endpoint = if endpoint_enabled {
            self.source.endpoint_records()
        } else {
            Vec::new()
        };

        ScrapeRecords {
            pool,
            statement,
            endpoint,
            statement_enabled,
            endpoint_enabled,
        }
    }

    fn all_statement_records(&self) -> Vec<StatRecord> {
        self.source
            .data_source_keys()
            .iter()
            .flat_map(|key| self.source.statement_records(key))
            .collect()
    }
}

impl fmt::Debug for StatSourceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatSourceAdapter")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
