//! Typed configuration for Herald.
//!
//! Configuration is applied in layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML or JSON file
//! 3. `HERALD__SECTION__KEY` environment variables
//!
//! Unknown fields are rejected at every level.
//!
//! # Example
//!
//! ```no_run
//! use herald_config::ConfigLoader;
//!
//! # fn main() -> Result<(), herald_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("herald.toml")?
//!     .with_env_prefix("HERALD")
//!     .load()?;
//!
//! println!("listening on {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # File format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [telemetry]
//! service_name = "herald"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [telemetry.metrics]
//! enabled = false
//! addr = "0.0.0.0:9090"
//! ```

mod config;
mod error;
mod loader;
mod schema;

pub use config::{HeraldConfig, HeraldConfigBuilder};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LoggingConfig, MetricsConfig, ServerConfig, TelemetryConfigSection};
