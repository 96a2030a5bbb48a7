//! # Herald Extract
//!
//! Binds HTTP requests to typed request objects and builds HTTP responses.
//!
//! ## Extractors
//!
//! | Extractor | Source | Description |
//! |-----------|--------|-------------|
//! | [`Query<T>`] | Query string | Parse URL query parameters |
//! | [`Form<T>`] | Request body | Parse URL-encoded form data |
//! | [`Json<T>`] | Request body | Deserialize a JSON body |
//!
//! Binding failures are reported as [`ExtractionError`] and never reach the
//! validators; they convert into a [`HeraldError`](herald_core::HeraldError),
//! 413 for an oversized body and 400 otherwise.
//!
//! ## Example
//!
//! ```rust
//! use herald_extract::{ExtractionContext, FromRequest, Query};
//! use http::{Method, Uri};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Lookup {
//!     name: Option<String>,
//! }
//!
//! let ctx = ExtractionContext::builder()
//!     .method(Method::GET)
//!     .uri(Uri::from_static("/?name=Grace"))
//!     .build();
//!
//! let Query(lookup) = Query::<Lookup>::from_request(&ctx).unwrap();
//! assert_eq!(lookup.name.as_deref(), Some("Grace"));
//! ```
//!
//! ## Response Builders
//!
//! ```rust
//! use herald_extract::response::{HtmlResponse, JsonResponse, Redirect};
//!
//! let json = JsonResponse::new(serde_json::json!({ "name": "Grace" }));
//! let html = HtmlResponse::new("<h1>Hello Grace</h1>");
//! let redirect = Redirect::to("/?name=Grace");
//!
//! assert_eq!(redirect.into_response().status(), http::StatusCode::FOUND);
//! ```

#![doc(html_root_url = "https://docs.rs/herald-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod extractor;
mod form;
mod json;
mod query;
pub mod response;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionSource};
pub use extractor::FromRequest;
pub use form::Form;
pub use json::Json;
pub use query::Query;

/// Largest request body the body extractors accept (1 MB).
///
/// The server enforces its own limit while reading the body; this one
/// guards bodies that reach an extractor by other paths.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;
