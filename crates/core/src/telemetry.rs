// Telemetry Module
//
// Structured logging for EventDeck built on tracing-subscriber:
// - Console fmt layer with an EnvFilter
// - Configuration from RUST_LOG / LOG_LEVEL
// - Safe to call more than once (later calls are ignored)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// Telemetry Configuration
// ============================================================================

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,
    /// Whether to enable console logging
    pub enable_console: bool,
    /// Log filter (e.g., "info", "debug", "eventdeck_core=debug")
    pub log_filter: Option<String>,
    /// Include the module target in each line
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "eventdeck".to_string(),
            enable_console: true,
            log_filter: None,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `EVENTDECK_SERVICE_NAME`: Service name (default: "eventdeck")
    /// - `RUST_LOG` or `LOG_LEVEL`: Log filter
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            service_name: lookup("EVENTDECK_SERVICE_NAME")
                .unwrap_or_else(|| "eventdeck".to_string()),
            enable_console: true,
            log_filter: lookup("RUST_LOG").or_else(|| lookup("LOG_LEVEL")),
            with_target: true,
        }
    }

    /// Override the log filter (e.g. from a `--quiet` flag)
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Resolve the configured filter, falling back to the default on parse errors
    pub fn env_filter(&self) -> EnvFilter {
        self.log_filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine readable.
/// If a subscriber is already installed (tests, embedding apps) this is a
/// no-op.
///
/// # Example
///
/// ```ignore
/// use eventdeck_core::telemetry::{init_tracing, TelemetryConfig};
///
/// #[tokio::main]
/// async fn main() {
///     init_tracing(TelemetryConfig::from_env());
///     // ... your application code
/// }
/// ```
pub fn init_tracing(config: TelemetryConfig) {
    let console_layer = if config.enable_console {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_filter(config.env_filter()),
        )
    } else {
        None
    };

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(service = %config.service_name, "Tracing initialized");
    }
}
