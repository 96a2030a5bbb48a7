//! Core extractor trait.

use crate::{ExtractionContext, ExtractionError};

/// Types that can be bound from an HTTP request.
///
/// ```rust
/// use herald_extract::{ExtractionContext, ExtractionError, FromRequest};
///
/// struct RequestPath(String);
///
/// impl FromRequest for RequestPath {
///     fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
///         Ok(RequestPath(ctx.path().to_string()))
///     }
/// }
/// ```
pub trait FromRequest: Sized {
    /// Extracts this type from the request context.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] if the request cannot be bound.
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError>;
}
