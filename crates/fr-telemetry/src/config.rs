//! Telemetry configuration from environment variables.

use std::env;

/// Configuration of log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to write logs to the console
    pub console_output: bool,

    /// Whether to format logs as JSON
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "facet-router".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FR_SERVICE_NAME`: Service name (default: facet-router)
    /// - `FR_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `FR_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `FR_JSON_LOGS`: Enable JSON logs (default: false)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration for one binary, keeping the environment's other
    /// settings.
    #[must_use]
    pub fn for_service(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            ..Self::from_env()
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("FR_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("FR_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: lookup("FR_CONSOLE_OUTPUT")
                .map_or(defaults.console_output, |v| {
                    v.to_lowercase() != "false" && v != "0"
                }),

            json_logs: lookup("FR_JSON_LOGS")
                .map_or(defaults.json_logs, |v| v.to_lowercase() == "true" || v == "1"),
        }
    }
}
