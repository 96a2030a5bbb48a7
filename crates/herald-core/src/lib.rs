//! # Herald Core
//!
//! Core types and traits for the Herald request pipeline.
//!
//! Every HTTP action in Herald binds its input to a typed request object,
//! validates it, and hands it to exactly one handler through the [`Mediator`].
//! This crate provides the pieces of that pipeline:
//!
//! - [`Request`] / [`RequestHandler`] - typed request objects and their handlers
//! - [`Mediator`] - immutable request-type → handler registry and dispatcher
//! - [`validation`] - rule chains and the [`Validator`] trait
//! - [`ValidationProblemDetails`] - the 400 response body built from validation failures
//! - [`RequestContext`] / [`CancellationToken`] - per-call state
//! - [`HeraldError`] - standard error type
//!
//! ## Example
//!
//! ```
//! use herald_core::{
//!     CancellationToken, HeraldResult, Mediator, Request, RequestHandler,
//!     validation::{CascadeMode, RuleSet},
//! };
//!
//! struct Greet {
//!     name: Option<String>,
//! }
//!
//! impl Request for Greet {
//!     type Response = String;
//! }
//!
//! struct GreetHandler;
//!
//! impl RequestHandler for GreetHandler {
//!     type Request = Greet;
//!
//!     async fn handle(&self, request: Greet, _cancel: CancellationToken) -> HeraldResult<String> {
//!         Ok(format!("Hello {}", request.name.unwrap_or_default()))
//!     }
//! }
//!
//! fn name(request: &Greet) -> Option<&str> {
//!     request.name.as_deref()
//! }
//!
//! let mut builder = Mediator::builder();
//! builder.register_handler(GreetHandler).unwrap();
//! builder.register_validator(
//!     RuleSet::new().rule_for("Name", name, |rules| {
//!         rules.cascade(CascadeMode::StopOnFirstFailure).not_empty()
//!     }),
//! );
//! let mediator = builder.build();
//!
//! let failures = mediator.validate(&Greet { name: None });
//! assert_eq!(failures.len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/herald-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod context;
mod error;
pub mod mediator;
mod metrics;
mod problem;
mod request;
pub mod validation;

pub use cancel::CancellationToken;
pub use context::{RequestContext, RequestId};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, HeraldError, HeraldResult};
pub use mediator::{DispatchError, Mediator, MediatorBuilder, RegistrationError, SendError};
pub use problem::{ValidationProblemDetails, PROBLEM_JSON_CONTENT_TYPE};
pub use request::{FnHandler, Request, RequestHandler};
pub use validation::{ValidationFailure, ValidationFailures, Validator};
