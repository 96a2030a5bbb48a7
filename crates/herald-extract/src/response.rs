//! Response builders.
//!
//! | Builder | Content-Type | Description |
//! |---------|--------------|-------------|
//! | [`JsonResponse`] | `application/json` | JSON serialized view model |
//! | [`HtmlResponse`] | `text/html` | Rendered page |
//! | [`ProblemResponse`] | `application/problem+json` | 400 validation problem |
//! | [`ErrorResponse`] | `application/json` | Error envelope |
//! | [`Redirect`] | N/A | 302 redirect |
//!
//! Builders never panic: a body that fails to serialize becomes a plain 500.

use bytes::Bytes;
use herald_core::{
    HeraldError, RequestId, ValidationFailures, ValidationProblemDetails,
    PROBLEM_JSON_CONTENT_TYPE,
};
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;

fn build(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response<Bytes> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn serialization_failure() -> Response<Bytes> {
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain; charset=utf-8",
        "Internal Server Error",
    )
}

/// JSON response builder.
///
/// ```rust
/// use herald_extract::response::JsonResponse;
///
/// let response = JsonResponse::new(serde_json::json!({ "message": "Hello Grace" })).into_response();
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match serde_json::to_vec(&self.data) {
            Ok(body) => build(self.status, "application/json", body),
            Err(_) => serialization_failure(),
        }
    }
}

/// HTML response builder.
#[derive(Debug, Clone)]
pub struct HtmlResponse {
    body: String,
    status: StatusCode,
}

impl HtmlResponse {
    /// Creates a new HTML response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        build(self.status, "text/html; charset=utf-8", self.body)
    }
}

/// 400 `application/problem+json` response for failed validation.
///
/// ```rust
/// use herald_core::ValidationFailures;
/// use herald_extract::response::ProblemResponse;
///
/// let failures: ValidationFailures = [("Name", "'Name' should not be empty.")].into_iter().collect();
/// let response = ProblemResponse::from_failures(&failures).into_response();
///
/// assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
/// assert_eq!(response.headers()["content-type"], "application/problem+json");
/// ```
#[derive(Debug, Clone)]
pub struct ProblemResponse {
    problem: ValidationProblemDetails,
}

impl ProblemResponse {
    /// Wraps an existing problem body.
    #[must_use]
    pub fn new(problem: ValidationProblemDetails) -> Self {
        Self { problem }
    }

    /// Translates validation failures into a problem response.
    #[must_use]
    pub fn from_failures(failures: &ValidationFailures) -> Self {
        Self::new(ValidationProblemDetails::from_failures(failures))
    }

    /// Returns the problem body.
    #[must_use]
    pub fn problem(&self) -> &ValidationProblemDetails {
        &self.problem
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match serde_json::to_vec(&self.problem) {
            Ok(body) => build(self.problem.status_code(), PROBLEM_JSON_CONTENT_TYPE, body),
            Err(_) => serialization_failure(),
        }
    }
}

/// Error envelope response built from a [`HeraldError`].
///
/// ```rust
/// use herald_core::HeraldError;
/// use herald_extract::response::ErrorResponse;
///
/// let response = ErrorResponse::new(&HeraldError::not_found("No route")).into_response();
/// assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ErrorResponse<'a> {
    error: &'a HeraldError,
    request_id: Option<RequestId>,
}

impl<'a> ErrorResponse<'a> {
    /// Creates a response for `error`.
    #[must_use]
    pub fn new(error: &'a HeraldError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }

    /// Includes the request ID in the envelope.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let request_id = self.request_id.map(|id| id.to_string());
        let envelope = self.error.to_envelope(request_id.as_deref());
        JsonResponse::new(envelope)
            .with_status(self.error.status_code())
            .into_response()
    }
}

/// HTTP redirect response builder.
#[derive(Debug, Clone)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    /// Creates a temporary redirect (302 Found).
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        StatusCode::FOUND
    }

    /// Returns the redirect location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Builds the HTTP response.
    ///
    /// A location that is not a valid header value yields a 500.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        let Ok(location) = HeaderValue::try_from(self.location) else {
            return serialization_failure();
        };

        let mut response = Response::new(Bytes::new());
        *response.status_mut() = status;
        response.headers_mut().insert(header::LOCATION, location);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        message: String,
    }

    #[test]
    fn test_json_response() {
        let response = JsonResponse::new(Greeting {
            message: "Hello Grace".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), br#"{"message":"Hello Grace"}"#);
    }

    #[test]
    fn test_html_response() {
        let response = HtmlResponse::new("<p>hi</p>")
            .with_status(StatusCode::ACCEPTED)
            .into_response();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_problem_response_body() {
        let failures: ValidationFailures = [("Name", "must not be empty")].into_iter().collect();
        let response = ProblemResponse::from_failures(&failures).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body().as_ref(),
            br#"{"status":400,"detail":"must not be empty","errors":{"Name":["must not be empty"]}}"#
        );
    }

    #[test]
    fn test_error_response_includes_request_id() {
        let error = HeraldError::timeout("too slow");
        let request_id = RequestId::new();
        let response = ErrorResponse::new(&error)
            .with_request_id(request_id)
            .into_response();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["code"], "TIMEOUT");
        assert_eq!(body["request_id"], request_id.to_string());
    }

    #[test]
    fn test_redirect() {
        let response = Redirect::to("/?name=Grace%20Hopper").into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/?name=Grace%20Hopper");
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_redirect_with_invalid_location_is_500() {
        let response = Redirect::to("/bad\nlocation").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
