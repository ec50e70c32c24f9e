//! ABOUTME: Core types, errors, stat records, and tracing utilities
//! ABOUTME: Foundation crate used by all other druid-prom components

pub mod error;
pub mod record;
pub mod source;
pub mod tags;
pub mod telemetry;
pub mod time;

pub use error::{Error, Result};
pub use record::{StatRecord, StatValue};
pub use source::StatSource;
pub use tags::TagSet;
pub use time::{epoch_millis, to_rfc3339, MonotonicTimer};
