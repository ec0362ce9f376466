//! # FR Telemetry
//!
//! Log setup shared by the binaries and test suites of the workspace.
//! Library crates only emit `tracing` events; whoever runs them calls
//! [`init_telemetry`] once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fr_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Your application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FR_SERVICE_NAME` | `facet-router` | Service name in log lines |
//! | `FR_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `FR_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `FR_JSON_LOGS` | `false` | JSON instead of plain text |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installing failed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The configuration cannot be turned into a filter.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Installs the global subscriber for `config`.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard marking telemetry as active. Logs shutdown when dropped.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Span carrying the subsystem name, for binaries that drive several
/// subsystems.
///
/// ```rust,ignore
/// let _span = fr_telemetry::subsystem_span!("deploy_router", subsystem = "selector-registry").entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
