use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(crate::Error::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Initialize tracing - safe to call multiple times
///
/// `RUST_LOG` wins over `default_level` when it is set. A subscriber installed
/// elsewhere (e.g. by a host process) is left in place.
pub fn init_tracing(format: LogFormat, default_level: &str, service: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let installed = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().json())
                .with(env_filter)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().pretty())
                .with(env_filter)
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().compact())
                .with(env_filter)
                .try_init(),
        };

        match installed {
            Ok(()) => tracing::info!(service = %service, ?format, "Tracing initialized"),
            Err(e) => tracing::debug!(service = %service, "Tracing already installed: {}", e),
        }
    });
}
