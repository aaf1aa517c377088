//! Logging setup.
//!
//! Human-readable output by default; `STUDYBUDDY_LOG_FORMAT=json` switches to
//! bunyan-style JSON lines. Verbosity follows `RUST_LOG` (default `info`).

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::AppError;

const SERVICE_NAME: &str = "studybuddy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("STUDYBUDDY_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        LogFormat::Json => registry
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), std::io::stdout))
            .try_init(),
    };

    result.map_err(|e| AppError::Internal(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env() {
        temp_env::with_var("STUDYBUDDY_LOG_FORMAT", Some("JSON"), || {
            assert_eq!(LogFormat::from_env(), LogFormat::Json);
        });
        temp_env::with_var("STUDYBUDDY_LOG_FORMAT", None::<&str>, || {
            assert_eq!(LogFormat::from_env(), LogFormat::Pretty);
        });
    }
}
