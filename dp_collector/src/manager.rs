//! Creates the collector from configuration and registers it with a registry.

use crate::collector::DruidCollector;
use crate::source::{EnableFlags, StatSource};
use dp_config::MetricsConfig;
use dp_core::Result;
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// Enable key of the whole collector
pub const ENABLE_DRUID: &str = "druid";
/// Enable key of statement statistics
pub const ENABLE_DRUID_SQL: &str = "druid-sql";
/// Enable key of endpoint statistics
pub const ENABLE_DRUID_URI: &str = "druid-uri";

/// Owns the collector, if the configuration enables it
#[derive(Debug)]
pub struct PrometheusManager {
    config: MetricsConfig,
    collector: Option<DruidCollector>,
}

impl PrometheusManager {
    /// Build the collector unless `druid` is disabled
    ///
    /// Fails when the configured tags are not usable as labels.
    pub fn new(config: &MetricsConfig, source: Arc<dyn StatSource>) -> Result<Self> {
        let collector = if config.is_enabled(ENABLE_DRUID) {
            let flags = EnableFlags::new(
                true,
                config.is_enabled(ENABLE_DRUID_SQL),
                config.is_enabled(ENABLE_DRUID_URI),
            );
            Some(DruidCollector::new(config.tag_set()?, flags, source))
        } else {
            tracing::info!("Druid metrics disabled by configuration");
            None
        };

        Ok(Self {
            config: config.clone(),
            collector,
        })
    }

    /// Register the collector; does nothing when it is disabled
    pub fn register(&self, registry: &mut Registry) {
        if let Some(collector) = &self.collector {
            registry.register_collector(Box::new(collector.clone()));
            tracing::info!(
                statement = collector.is_statement_enabled(),
                endpoint = collector.is_endpoint_enabled(),
                "Druid collector registered"
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled(ENABLE_DRUID)
    }

    pub fn is_key_enabled(&self, key: &str) -> bool {
        self.config.is_enabled(key)
    }

    /// Shared handle for toggling statement and endpoint statistics at runtime
    pub fn collector(&self) -> Option<&DruidCollector> {
        self.collector.as_ref()
    }
}
