//! Root configuration type and its builder.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::{ConfigError, ServerConfig, TelemetryConfigSection};

/// Complete Herald configuration.
///
/// ```
/// use herald_config::HeraldConfig;
///
/// let config = HeraldConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HeraldConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Telemetry configuration (logging, metrics).
    #[serde(default)]
    pub telemetry: TelemetryConfigSection,
}

impl HeraldConfig {
    /// Create a new configuration builder.
    ///
    /// ```
    /// use herald_config::{HeraldConfig, ServerConfig};
    ///
    /// let config = HeraldConfig::builder()
    ///     .server(ServerConfig {
    ///         http_addr: "127.0.0.1:3000".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> HeraldConfigBuilder {
        HeraldConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// Checks that the server address (and the metrics address, when metrics
    /// are enabled) parse as socket addresses and that the request timeout is
    /// non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.http_addr()?;

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.telemetry.metrics.enabled {
            self.metrics_addr()?;
        }

        if self.telemetry.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Parsed server bind address.
    pub fn http_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            )
        })
    }

    /// Parsed metrics exporter address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.telemetry.metrics.addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            )
        })
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// Shutdown timeout as a [`Duration`].
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

/// Builder for [`HeraldConfig`].
#[derive(Debug, Default)]
pub struct HeraldConfigBuilder {
    server: Option<ServerConfig>,
    telemetry: Option<TelemetryConfigSection>,
}

impl HeraldConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfigSection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HeraldConfig {
        HeraldConfig {
            server: self.server.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }
}
