//! # Herald
//!
//! Request objects dispatched through a mediator, validated by declarative
//! rule chains, served over HTTP.
//!
//! ```text
//! HTTP → Router → Controller ─ bind ─→ Request object
//!                                          │
//!                                  Mediator::send
//!                               ┌──────────┴──────────┐
//!                          validators              handler
//!                               │                     │
//!                 400 problem / re-render         view model → JSON / HTML
//! ```
//!
//! The crate is both the application (features, controllers and views) and a
//! facade over the framework crates.
//!
//! ## Example
//!
//! ```rust
//! use herald::core::CancellationToken;
//! use herald::features::home::{ProvideName, WelcomeMessage};
//!
//! # tokio_test::block_on(async {
//! let mediator = herald::app::build_mediator().unwrap();
//!
//! let view = mediator
//!     .dispatch(WelcomeMessage::named("Ada"), CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert_eq!(view.message, "Hello Ada");
//!
//! let failures = mediator.validate(&ProvideName::new(""));
//! assert_eq!(failures.messages().next(), Some("'Name' should not be empty."));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/herald/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod controllers;
pub mod features;
pub mod views;

// Re-export framework crates
pub use herald_config as config;
pub use herald_core as core;
pub use herald_extract as extract;
pub use herald_server as server;
pub use herald_telemetry as telemetry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use herald::prelude::*;
///
/// let failures = ValidationFailures::new();
/// assert!(failures.is_valid());
/// ```
pub mod prelude {
    pub use herald_config::{ConfigLoader, HeraldConfig};
    pub use herald_core::validation::{CascadeMode, RuleSet};
    pub use herald_core::{
        CancellationToken, DispatchError, HeraldError, HeraldResult, Mediator, Request,
        RequestContext, RequestHandler, SendError, ValidationFailures, ValidationProblemDetails,
        Validator,
    };
    pub use herald_extract::response::{HtmlResponse, JsonResponse, ProblemResponse, Redirect};
    pub use herald_extract::{ExtractionContext, Form, FromRequest, Json, Query};
    pub use herald_server::{ActionRegistry, Router, Server};
}
