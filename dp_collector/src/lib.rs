//! ABOUTME: Translates connection pool, statement and endpoint statistics into metric families
//! ABOUTME: Provides the scrape collector, its registry wiring and text exposition
//!
//! # Architecture
//!
//! ```text
//! DruidCollector::collect()
//!   ├── StatSourceAdapter::fetch()   ← injected StatSource, gated by EnableFlags
//!   ├── METRIC_FIELDS                ← one row per exposed field
//!   └── Assembler::build()           ← names, label schemas, samples
//!
//! PrometheusManager
//!   └── register() → prometheus_client Registry → encode_text()
//! ```

pub mod assemble;
pub mod collector;
pub mod exposition;
pub mod family;
pub mod fields;
pub mod labels;
pub mod manager;
pub mod naming;
pub mod sanitize;
pub mod source;

pub use assemble::{Assembler, GroupDescriptor};
pub use collector::DruidCollector;
pub use exposition::{encode_text, escape_label_value};
pub use family::{MetricFamily, Sample};
pub use fields::{FieldKind, MetricField, StatGroup, METRIC_FIELDS};
pub use labels::{LabelSchemas, SchemaId, BUCKET_BOUNDARIES};
pub use manager::PrometheusManager;
pub use naming::snake_case;
pub use sanitize::sanitize;
pub use source::{EnableFlags, StatSource, StatSourceAdapter};
