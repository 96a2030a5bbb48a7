//! Error types for Herald.
//!
//! [`HeraldError`] is what handlers return and what the server renders with
//! the JSON error envelope. Validation failures found by rule sets are not
//! errors in this sense; they travel as [`ValidationFailures`](crate::ValidationFailures)
//! values and are rendered by the problem translator instead.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`HeraldError`].
pub type HeraldResult<T> = Result<T, HeraldError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input that could not be bound to a request object.
    Validation,
    /// Unknown route or resource.
    NotFound,
    /// Internal errors, including configuration defects.
    Internal,
    /// The call did not finish in time.
    Timeout,
    /// The request body exceeded the configured limit.
    PayloadTooLarge,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// Standard error type for Herald.
///
/// # Example
///
/// ```
/// use herald_core::{ErrorCategory, HeraldError};
///
/// let error = HeraldError::not_found("No route for GET /missing");
/// assert_eq!(error.category(), ErrorCategory::NotFound);
/// assert_eq!(error.status_code().as_u16(), 404);
/// ```
#[derive(Error, Debug)]
pub enum HeraldError {
    /// The request could not be bound.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Optional structured details for the envelope.
        details: Option<serde_json::Value>,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The call timed out or was cancelled.
    #[error("Timeout: {message}")]
    Timeout {
        /// Human-readable error message.
        message: String,
    },

    /// The request body was larger than the server accepts.
    #[error("Payload too large: {message}")]
    PayloadTooLarge {
        /// Human-readable error message.
        message: String,
    },
}

impl HeraldError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Creates a validation error carrying structured details.
    #[must_use]
    pub fn validation_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a payload too large error.
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::PayloadTooLarge { .. } => ErrorCategory::PayloadTooLarge,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the machine-readable error code used in envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        let details = match self {
            Self::Validation { details, .. } => details.clone(),
            _ => None,
        };

        ErrorEnvelope {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                category: self.category(),
                details,
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = HeraldError::validation("Body is not valid JSON");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("Body is not valid JSON"));
    }

    #[test]
    fn test_validation_error_details_reach_envelope() {
        let error = HeraldError::validation_with_details(
            "Failed to bind form",
            serde_json::json!({ "source": "form" }),
        );

        let envelope = error.to_envelope(Some("req-123"));
        assert_eq!(envelope.error.code, "VALIDATION_ERROR");
        assert_eq!(envelope.error.details.unwrap()["source"], "form");
    }

    #[test]
    fn test_internal_error_hides_source_from_message() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let error = HeraldError::internal_with_source("Render failed", source);

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.to_string().contains("disk on fire"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_timeout_error() {
        let error = HeraldError::timeout("Request exceeded 30000ms");
        assert_eq!(error.category(), ErrorCategory::Timeout);
        assert_eq!(error.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_payload_too_large_error() {
        let error = HeraldError::payload_too_large("body exceeds 1048576 bytes");
        assert_eq!(error.category(), ErrorCategory::PayloadTooLarge);
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.to_envelope(None).error.code, "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = HeraldError::not_found("No route for GET /missing");
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
        assert!(json.contains("\"category\":\"not_found\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_envelope_without_request_id_omits_field() {
        let envelope = HeraldError::internal("boom").to_envelope(None);
        let json = serde_json::to_value(&envelope).expect("serialization should work");
        assert!(json.get("request_id").is_none());
    }

    #[test]
    fn test_all_error_categories_have_status_codes() {
        let categories = [
            ErrorCategory::Validation,
            ErrorCategory::NotFound,
            ErrorCategory::Internal,
            ErrorCategory::Timeout,
            ErrorCategory::PayloadTooLarge,
        ];

        for category in categories {
            let status = category.default_status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Category {category:?} should map to error status code, got {status}"
            );
        }
    }
}
