//! Problem-details body for validation failures.

use crate::ValidationFailures;
use http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Content type used for problem-details responses.
pub const PROBLEM_JSON_CONTENT_TYPE: &str = "application/problem+json";

/// The 400 response body built from a list of validation failures.
///
/// `errors` groups messages by field in first-seen order. Messages keep the
/// order they were reported in, and `detail` joins all of them with `"\n"`.
///
/// # Example
///
/// ```
/// use herald_core::{ValidationFailures, ValidationProblemDetails};
///
/// let failures: ValidationFailures = [("Name", "must not be empty")].into_iter().collect();
/// let problem = ValidationProblemDetails::from_failures(&failures);
///
/// assert_eq!(
///     serde_json::to_string(&problem).unwrap(),
///     r#"{"status":400,"detail":"must not be empty","errors":{"Name":["must not be empty"]}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblemDetails {
    /// Always 400.
    pub status: u16,
    /// All failure messages joined by newlines.
    pub detail: String,
    /// Messages grouped by field name.
    pub errors: IndexMap<String, Vec<String>>,
}

impl ValidationProblemDetails {
    /// Builds the problem body from `failures`.
    ///
    /// Total: an empty list yields an empty `detail` and no `errors`.
    #[must_use]
    pub fn from_failures(failures: &ValidationFailures) -> Self {
        let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();
        for failure in failures {
            errors
                .entry(failure.field.clone())
                .or_default()
                .push(failure.message.clone());
        }

        Self {
            status: StatusCode::BAD_REQUEST.as_u16(),
            detail: failures.to_string(),
            errors,
        }
    }

    /// Returns the HTTP status for this body.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<&ValidationFailures> for ValidationProblemDetails {
    fn from(failures: &ValidationFailures) -> Self {
        Self::from_failures(failures)
    }
}
