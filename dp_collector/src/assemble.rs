//! Metric family assembly.
//!
//! Every group is built through the same three shapes (gauge, bucketed
//! histogram, error gauge), parameterized by a [`GroupDescriptor`] that knows
//! the group's dynamic label values.

use crate::family::MetricFamily;
use crate::fields::{FieldKind, MetricField, StatGroup};
use crate::labels::{LabelSchemas, SchemaId, BUCKET_BOUNDARIES};
use crate::naming::{help_text, metric_name};
use crate::sanitize::sanitize;
use dp_core::{epoch_millis, Error, Result, StatRecord, TagSet};
use std::time::SystemTime;

/// Record field holding the data source (pool) name
pub const FIELD_NAME: &str = "Name";
/// Record field holding the statement text
pub const FIELD_SQL: &str = "SQL";
/// Record field holding the request URI
pub const FIELD_URI: &str = "URI";
pub const FIELD_LAST_ERROR_CLASS: &str = "LastErrorClass";
pub const FIELD_LAST_ERROR_MESSAGE: &str = "LastErrorMessage";

/// Per-group parameters of the family builders
#[derive(Debug, Clone, Copy)]
pub struct GroupDescriptor {
    pub group: StatGroup,
    /// Label values that follow the tag values, in schema order
    pub dimensions: fn(&StatRecord) -> Result<Vec<String>>,
}

impl GroupDescriptor {
    pub fn of(group: StatGroup) -> &'static GroupDescriptor {
        match group {
            StatGroup::Pool => &POOL,
            StatGroup::Statement => &STATEMENT,
            StatGroup::Endpoint => &ENDPOINT,
        }
    }

    fn group_name(&self) -> &'static str {
        self.group.as_str()
    }
}

static POOL: GroupDescriptor = GroupDescriptor {
    group: StatGroup::Pool,
    dimensions: pool_dimensions,
};

static STATEMENT: GroupDescriptor = GroupDescriptor {
    group: StatGroup::Statement,
    dimensions: statement_dimensions,
};

static ENDPOINT: GroupDescriptor = GroupDescriptor {
    group: StatGroup::Endpoint,
    dimensions: endpoint_dimensions,
};

fn pool_dimensions(record: &StatRecord) -> Result<Vec<String>> {
    Ok(vec![record.text("pool", FIELD_NAME)?.to_string()])
}

fn statement_dimensions(record: &StatRecord) -> Result<Vec<String>> {
    Ok(vec![
        record.text("sql", FIELD_NAME)?.to_string(),
        sanitize(record.text("sql", FIELD_SQL)?).into_owned(),
    ])
}

fn endpoint_dimensions(record: &StatRecord) -> Result<Vec<String>> {
    Ok(vec![record.text("uri", FIELD_URI)?.to_string()])
}

/// Builds metric families from stat records
///
/// Holds the static tags and the label schemas derived from them, both fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct Assembler {
    tags: TagSet,
    schemas: LabelSchemas,
}

impl Assembler {
    pub fn new(tags: TagSet) -> Self {
        let schemas = LabelSchemas::new(&tags);
        Self { tags, schemas }
    }

    fn family(&self, group: StatGroup, kind: FieldKind, field: &str) -> MetricFamily {
        MetricFamily::new(
            metric_name(group, kind, field),
            help_text(group, field),
            self.schemas.get(SchemaId::for_field(group, kind)).to_vec(),
        )
    }

    fn label_values(&self, dimensions: Vec<String>) -> Vec<String> {
        let mut values = Vec::with_capacity(self.tags.len() + dimensions.len() + 1);
        values.extend(self.tags.values().iter().cloned());
        values.extend(dimensions);
        values
    }

    /// One sample per record valued by `select`
    pub fn build_gauge<F>(
        &self,
        group: &GroupDescriptor,
        field: &str,
        records: &[StatRecord],
        select: F,
    ) -> Result<MetricFamily>
    where
        F: Fn(&StatRecord) -> Result<f64>,
    {
        let mut family = self.family(group.group, FieldKind::Gauge, field);
        family.samples.reserve(records.len());

        for record in records {
            let value = select(record)?;
            let labels = self.label_values((group.dimensions)(record)?);
            family.add_sample(labels, value);
        }

        Ok(family)
    }

    /// One sample per record and bucket position, labeled with `le`
    ///
    /// Values are the raw per-bucket counts, not cumulative totals. Arrays
    /// longer than [`BUCKET_BOUNDARIES`] are truncated.
    pub fn build_histogram<F>(
        &self,
        group: &GroupDescriptor,
        field: &str,
        records: &[StatRecord],
        select: F,
    ) -> Result<MetricFamily>
    where
        F: for<'r> Fn(&'r StatRecord) -> Result<&'r [u64]>,
    {
        let mut family = self.family(group.group, FieldKind::Histogram, field);
        family.samples.reserve(records.len() * BUCKET_BOUNDARIES.len());

        for record in records {
            let counts = select(record)?;
            let base = self.label_values((group.dimensions)(record)?);

            for (count, le) in counts.iter().zip(BUCKET_BOUNDARIES) {
                let mut labels = base.clone();
                labels.push(le.to_string());
                family.add_sample(labels, *count as f64);
            }
        }

        Ok(family)
    }

    /// One sample per statement record that has a recorded error
    ///
    /// The value is the error's epoch milliseconds. Records without a
    /// timestamp are skipped rather than reported as zero.
    pub fn build_error_gauge<F>(
        &self,
        field: &str,
        records: &[StatRecord],
        select: F,
    ) -> Result<MetricFamily>
    where
        F: Fn(&StatRecord) -> Result<Option<SystemTime>>,
    {
        let group = GroupDescriptor::of(StatGroup::Statement);
        let mut family = self.family(group.group, FieldKind::ErrorGauge, field);

        for record in records {
            let Some(at) = select(record)? else {
                continue;
            };

            let mut dimensions = (group.dimensions)(record)?;
            let class = record.optional_text(group.group_name(), FIELD_LAST_ERROR_CLASS)?;
            let message = record.optional_text(group.group_name(), FIELD_LAST_ERROR_MESSAGE)?;
            dimensions.push(class.unwrap_or_default().to_string());
            dimensions.push(message.unwrap_or_default().to_string());

            family.add_sample(self.label_values(dimensions), epoch_millis(at));
        }

        Ok(family)
    }

    /// Build the family of one table row, reading the row's field by name
    pub fn build(&self, field: &MetricField, records: &[StatRecord]) -> Result<MetricFamily> {
        let descriptor = GroupDescriptor::of(field.group);
        let group = descriptor.group_name();
        let name = field.name;

        match field.kind {
            FieldKind::Gauge => {
                self.build_gauge(descriptor, name, records, |r| r.number(group, name))
            }
            FieldKind::Histogram => {
                self.build_histogram(descriptor, name, records, |r| r.buckets(group, name))
            }
            FieldKind::ErrorGauge if field.group == StatGroup::Statement => {
                self.build_error_gauge(name, records, |r| r.optional_timestamp(group, name))
            }
            FieldKind::ErrorGauge => Err(Error::Config(format!(
                "error gauge {} is only supported for statement statistics",
                name
            ))),
        }
    }
}
