/// Core error type for druid-prom
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing field {field} on {group} record")]
    MissingField { group: &'static str, field: String },

    #[error("Field {field} on {group} record has wrong type: expected {expected}, found {found}")]
    FieldType {
        group: &'static str,
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Encoding error: {0}")]
    Encode(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
