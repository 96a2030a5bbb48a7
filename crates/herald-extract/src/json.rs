//! JSON body extractor.

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest, MAX_BODY_SIZE};
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// Extractor for JSON request bodies.
///
/// ```rust
/// use herald_extract::{ExtractionContext, FromRequest, Json};
/// use http::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Submit {
///     name: Option<String>,
/// }
///
/// let ctx = ExtractionContext::builder()
///     .method(Method::POST)
///     .header("content-type", "application/json")
///     .body(r#"{"name":"Grace"}"#)
///     .build();
///
/// let Json(submit) = Json::<Submit>::from_request(&ctx).unwrap();
/// assert_eq!(submit.name.as_deref(), Some("Grace"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the Json and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn is_json_media_type(media_type: &str) -> bool {
    let media_type = media_type.to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

impl<T: DeserializeOwned> FromRequest for Json<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        if let Some(media_type) = ctx.media_type() {
            if !is_json_media_type(media_type) {
                return Err(ExtractionError::unsupported_media_type(
                    "application/json",
                    media_type,
                ));
            }
        }

        let body = ctx.body();
        if body.len() > MAX_BODY_SIZE {
            return Err(ExtractionError::payload_too_large(MAX_BODY_SIZE, body.len()));
        }

        if body.is_empty() {
            return Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                "empty request body",
            ));
        }

        let value: T = serde_json::from_slice(body).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
        })?;

        Ok(Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Submit {
        #[serde(default, alias = "Name")]
        name: Option<String>,
    }

    fn json_ctx(body: &'static str) -> ExtractionContext {
        ExtractionContext::builder()
            .method(Method::POST)
            .header("content-type", "application/json")
            .body(body)
            .build()
    }

    #[test]
    fn test_json_binds_value() {
        let Json(submit) = Json::<Submit>::from_request(&json_ctx(r#"{"name":"Grace"}"#)).unwrap();
        assert_eq!(submit.name.as_deref(), Some("Grace"));
    }

    #[test]
    fn test_json_accepts_capitalized_alias() {
        let Json(submit) = Json::<Submit>::from_request(&json_ctx(r#"{"Name":"Grace"}"#)).unwrap();
        assert_eq!(submit.name.as_deref(), Some("Grace"));
    }

    #[test]
    fn test_json_null_and_missing_are_none() {
        let Json(null) = Json::<Submit>::from_request(&json_ctx(r#"{"name":null}"#)).unwrap();
        assert!(null.name.is_none());

        let Json(missing) = Json::<Submit>::from_request(&json_ctx("{}")).unwrap();
        assert!(missing.name.is_none());
    }

    #[test]
    fn test_empty_body_is_error() {
        let err = Json::<Submit>::from_request(&json_ctx("")).unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("empty request body"));
    }

    #[test]
    fn test_malformed_body_is_error() {
        let err = Json::<Submit>::from_request(&json_ctx("{not json")).unwrap_err();
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
    }

    #[test]
    fn test_wrong_content_type_is_rejected() {
        let ctx = ExtractionContext::builder()
            .method(Method::POST)
            .header("content-type", "text/plain")
            .body(r#"{"name":"Grace"}"#)
            .build();

        let err = Json::<Submit>::from_request(&ctx).unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_problem_json_media_type_is_accepted() {
        assert!(is_json_media_type("application/problem+json"));
        assert!(is_json_media_type("Application/JSON"));
        assert!(!is_json_media_type("text/html"));
    }
}
