//! Observability for Herald: structured logging and Prometheus metrics.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output
//! - **Metrics**: `metrics` facade, optionally exported over HTTP in
//!   Prometheus format
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::builder().service_name("greeter").build();
//!     init_telemetry(&config).expect("telemetry");
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use self::config::{TelemetryConfig, TelemetryConfigBuilder};
pub use self::error::TelemetryError;
pub use self::logging::{init_logging, LogConfig};
pub use self::metrics::{init_metrics, InFlightGuard, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns [`TelemetryError`] if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    Ok(())
}
