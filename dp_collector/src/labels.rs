//! Label schemas: static tag keys followed by the dimensions of each group.

use crate::fields::{FieldKind, StatGroup};
use dp_core::TagSet;

/// Positional latency bucket labels used for the `le` dimension
pub const BUCKET_BOUNDARIES: [&str; 7] = ["1ms", "10ms", "100ms", "1s", "10s", "100s", "Inf"];

/// Identifies one label layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    Pool,
    PoolHistogram,
    Statement,
    StatementHistogram,
    StatementError,
    Endpoint,
    EndpointHistogram,
}

impl SchemaId {
    pub const ALL: [SchemaId; 7] = [
        SchemaId::Pool,
        SchemaId::PoolHistogram,
        SchemaId::Statement,
        SchemaId::StatementHistogram,
        SchemaId::StatementError,
        SchemaId::Endpoint,
        SchemaId::EndpointHistogram,
    ];

    /// Schema used by families of `kind` in `group`
    pub fn for_field(group: StatGroup, kind: FieldKind) -> SchemaId {
        match (group, kind) {
            (StatGroup::Pool, FieldKind::Histogram) => SchemaId::PoolHistogram,
            (StatGroup::Pool, _) => SchemaId::Pool,
            (StatGroup::Statement, FieldKind::Gauge) => SchemaId::Statement,
            (StatGroup::Statement, FieldKind::Histogram) => SchemaId::StatementHistogram,
            (StatGroup::Statement, FieldKind::ErrorGauge) => SchemaId::StatementError,
            (StatGroup::Endpoint, FieldKind::Histogram) => SchemaId::EndpointHistogram,
            (StatGroup::Endpoint, _) => SchemaId::Endpoint,
        }
    }

    /// Labels appended after the tag keys
    pub fn dimensions(self) -> &'static [&'static str] {
        match self {
            SchemaId::Pool => &["pool"],
            SchemaId::PoolHistogram => &["pool", "le"],
            SchemaId::Statement => &["pool", "sql"],
            SchemaId::StatementHistogram => &["pool", "sql", "le"],
            SchemaId::StatementError => &["pool", "sql", "class", "message"],
            SchemaId::Endpoint => &["uri"],
            SchemaId::EndpointHistogram => &["uri", "le"],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Label names of every schema, computed once from the tag keys
#[derive(Debug, Clone)]
pub struct LabelSchemas {
    schemas: [Vec<String>; 7],
}

impl LabelSchemas {
    pub fn new(tags: &TagSet) -> Self {
        let schemas = SchemaId::ALL.map(|id| {
            tags.keys()
                .iter()
                .cloned()
                .chain(id.dimensions().iter().map(|d| d.to_string()))
                .collect::<Vec<String>>()
        });
        Self { schemas }
    }

    pub fn get(&self, id: SchemaId) -> &[String] {
        &self.schemas[id.index()]
    }
}
