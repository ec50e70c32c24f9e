//! Text exposition of a registry.

use dp_core::{Error, Result};
use prometheus_client::{encoding::text::encode, registry::Registry};
use std::borrow::Cow;

/// Render every registered metric, failing if any collector fails to scrape
pub fn encode_text(registry: &Registry) -> Result<String> {
    let mut buffer = String::new();
    encode(&mut buffer, registry)
        .map_err(|e| Error::Encode(format!("Failed to encode metrics: {}", e)))?;
    tracing::debug!("Metrics encoded successfully, {} bytes", buffer.len());
    Ok(buffer)
}

/// Escape a label value for the text format: `\`, `"` and line feeds
///
/// The registry's encoder writes label values verbatim, so values that may
/// carry quotes or newlines (statement text, error messages) go through here
/// before encoding. Clean values are borrowed.
pub fn escape_label_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
