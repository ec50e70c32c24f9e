//! Scrape orchestration: one complete snapshot per `collect()` call.

use crate::assemble::Assembler;
use crate::exposition::escape_label_value;
use crate::family::MetricFamily;
use crate::fields::{family_count, StatGroup, METRIC_FIELDS};
use crate::source::{EnableFlags, StatSource, StatSourceAdapter};
use dp_core::{MonotonicTimer, Result, TagSet};
use prometheus_client::{
    collector::Collector,
    encoding::DescriptorEncoder,
    metrics::MetricType,
};
use std::borrow::Cow;
use std::sync::Arc;

/// Translates connection pool, statement and endpoint statistics into metric families
///
/// Cheap to clone; clones share the stat source and the runtime enable flags,
/// so a clone can be registered with a registry while the original is kept to
/// toggle statement and endpoint collection.
#[derive(Debug, Clone)]
pub struct DruidCollector {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    assembler: Assembler,
    source: StatSourceAdapter,
}

impl DruidCollector {
    pub fn new(tags: TagSet, flags: EnableFlags, source: Arc<dyn StatSource>) -> Self {
        tracing::debug!(tags = tags.len(), ?flags, "Creating druid collector");
        Self {
            inner: Arc::new(Inner {
                assembler: Assembler::new(tags),
                source: StatSourceAdapter::new(source, flags),
            }),
        }
    }

    /// Build a full snapshot from the current statistics
    ///
    /// Families come out in field-table order: pool gauges, pool histograms,
    /// then statement and endpoint families when those groups are enabled.
    /// Any malformed record fails the whole scrape.
    pub fn collect(&self) -> Result<Vec<MetricFamily>> {
        let timer = MonotonicTimer::new();
        let records = self.inner.source.fetch();

        let capacity: usize = StatGroup::ALL
            .iter()
            .filter(|group| records.is_enabled(**group))
            .map(|group| records.records(*group).len() * family_count(*group))
            .sum();
        let mut families = Vec::with_capacity(capacity);

        for field in METRIC_FIELDS {
            if !records.is_enabled(field.group) {
                continue;
            }
            let family = self
                .inner
                .assembler
                .build(field, records.records(field.group))
                .map_err(|e| {
                    tracing::warn!(
                        group = field.group.as_str(),
                        field = field.name,
                        "Stat record does not match the expected shape: {}",
                        e
                    );
                    e
                })?;
            families.push(family);
        }

        tracing::debug!(
            pools = records.pool.len(),
            statements = records.statement.len(),
            endpoints = records.endpoint.len(),
            families = families.len(),
            elapsed_ms = timer.elapsed_millis(),
            "Druid scrape complete"
        );

        Ok(families)
    }

    pub fn is_enabled(&self, group: StatGroup) -> bool {
        self.inner.source.flags().is_enabled(group)
    }

    pub fn is_statement_enabled(&self) -> bool {
        self.is_enabled(StatGroup::Statement)
    }

    pub fn set_statement_enabled(&self, enabled: bool) {
        tracing::info!(enabled, "Toggling druid statement statistics");
        self.inner
            .source
            .flags()
            .set_enabled(StatGroup::Statement, enabled);
    }

    pub fn is_endpoint_enabled(&self) -> bool {
        self.is_enabled(StatGroup::Endpoint)
    }

    pub fn set_endpoint_enabled(&self, enabled: bool) {
        tracing::info!(enabled, "Toggling druid endpoint statistics");
        self.inner
            .source
            .flags()
            .set_enabled(StatGroup::Endpoint, enabled);
    }
}

impl Collector for DruidCollector {
    fn encode(&self, mut encoder: DescriptorEncoder) -> std::result::Result<(), std::fmt::Error> {
        let families = self.collect().map_err(|e| {
            tracing::error!("Failed to collect druid statistics: {}", e);
            std::fmt::Error
        })?;

        for family in &families {
            let mut metric_encoder =
                encoder.encode_descriptor(&family.name, &family.help, None, MetricType::Gauge)?;
            for sample in &family.samples {
                let labels: Vec<(&str, Cow<'_, str>)> = family
                    .labels(sample)
                    .into_iter()
                    .map(|(name, value)| (name, escape_label_value(value)))
                    .collect();
                metric_encoder
                    .encode_family(&labels)?
                    .encode_gauge(&sample.value)?;
            }
        }

        Ok(())
    }
}
