//! Logging and tracing setup
//!
//! Console or JSON-formatted structured logging via `tracing`, with
//! the filter taken from configuration or `RUST_LOG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::infra::{CartEngineError, Result};

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level filter (e.g. "info", "cart_engine=debug").
    pub log_level: String,
    /// Emit JSON-formatted log lines instead of human-readable ones.
    pub json_format: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_format: false,
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_format: std::env::var("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| CartEngineError::Configuration(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let initialized = if config.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    initialized
        .map_err(|e| CartEngineError::Configuration(format!("telemetry init failed: {e}")))?;

    Ok(())
}
