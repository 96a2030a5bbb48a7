//! Prometheus metrics.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `herald_requests_total` | Counter | `action`, `status` |
//! | `herald_request_duration_seconds` | Histogram | `action` |
//! | `herald_in_flight_requests` | Gauge | - |
//! | `herald_dispatch_total` | Counter | `request_type`, `outcome` |
//! | `herald_validation_failures_total` | Counter | `request_type` |
//!
//! Recording functions go through the `metrics` facade and are no-ops until
//! [`init_metrics`] installs the exporter. The dispatch and validation
//! counters are recorded by `herald-core`; they are only described here.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use ::metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

const REQUESTS_TOTAL: &str = "herald_requests_total";
const REQUEST_DURATION: &str = "herald_request_duration_seconds";
const IN_FLIGHT: &str = "herald_in_flight_requests";
const DISPATCH_TOTAL: &str = "herald_dispatch_total";
const VALIDATION_FAILURES: &str = "herald_validation_failures_total";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is installed.
    pub enabled: bool,

    /// Address the exporter listens on (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime so the listener is spawned
/// onto it. Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidAddress`] for an unparsable address and
/// [`TelemetryError::MetricsInit`] if the exporter cannot be installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .install()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    register_metric_descriptions();
    tracing::info!(%addr, "prometheus exporter listening");

    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests processed");
    describe_histogram!(REQUEST_DURATION, "HTTP request duration in seconds");
    describe_gauge!(
        IN_FLIGHT,
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(DISPATCH_TOTAL, "Mediator dispatches by request type and outcome");
    describe_counter!(
        VALIDATION_FAILURES,
        "Validation failures reported by the mediator"
    );
}

/// Records a completed HTTP request.
pub fn record_request(action: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "action" => action.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION, "action" => action.to_string()).record(duration.as_secs_f64());
}

/// Increments the in-flight requests gauge.
pub fn increment_in_flight() {
    gauge!(IN_FLIGHT).increment(1.0);
}

/// Decrements the in-flight requests gauge.
pub fn decrement_in_flight() {
    gauge!(IN_FLIGHT).decrement(1.0);
}

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Creates a new guard and increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        increment_in_flight();
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        decrement_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
        assert_eq!(config.duration_buckets.len(), 12);
    }

    #[test]
    fn test_disabled_init_is_noop() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            enabled: true,
            addr: "not-an-address".to_string(),
            ..MetricsConfig::default()
        };

        let err = init_metrics(&config).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidAddress(_)));
    }

    #[test]
    fn test_record_functions_without_recorder() {
        record_request("home.index", 200, Duration::from_millis(10));
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
