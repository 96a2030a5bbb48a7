//! Form data extractor.

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest, MAX_BODY_SIZE};
use serde::de::DeserializeOwned;
use std::ops::Deref;

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Extractor for `application/x-www-form-urlencoded` bodies.
///
/// An empty body binds like an empty form: every `Option` field is `None`.
/// Whether that is acceptable is up to the validators. A Content-Type other
/// than the form media type is rejected; a missing one is tolerated.
///
/// ```rust
/// use herald_extract::{ExtractionContext, Form, FromRequest};
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
///     .header("content-type", "application/x-www-form-urlencoded")
///     .body("name=Grace+Hopper")
///     .build();
///
/// let Form(submit) = Form::<Submit>::from_request(&ctx).unwrap();
/// assert_eq!(submit.name.as_deref(), Some("Grace Hopper"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    /// Consumes the Form and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Form<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Form<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        if let Some(media_type) = ctx.media_type() {
            if !media_type.eq_ignore_ascii_case(FORM_MEDIA_TYPE) {
                return Err(ExtractionError::unsupported_media_type(
                    FORM_MEDIA_TYPE,
                    media_type,
                ));
            }
        }

        let body = ctx.body();
        if body.len() > MAX_BODY_SIZE {
            return Err(ExtractionError::payload_too_large(MAX_BODY_SIZE, body.len()));
        }

        let value: T = serde_urlencoded::from_bytes(body).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
        })?;

        Ok(Form(value))
    }
}
