//! # Herald Server
//!
//! HTTP server for Herald applications:
//!
//! - HTTP/1.1 via hyper, one Tokio task per connection
//! - Method + path routing to named actions
//! - Per-request timeout wired to the handler's cancellation token
//! - `x-request-id` on every response and a JSON error envelope for failures
//! - `/health` and `/ready` probes
//! - Graceful shutdown on SIGTERM / SIGINT
//!
//! [`Server::handle`] runs the full pipeline on a buffered request without a
//! socket, which is how the integration tests drive applications.

mod config;
mod error;
mod handler;
mod health;
mod router;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use handler::{ActionFuture, ActionRegistry, ErasedAction};
pub use health::{HealthCheck, HealthStatus, ReadinessCheck, ReadinessStatus};
pub use router::Router;
pub use server::{HttpResponse, ResponseBody, Server, ServerBuilder, REQUEST_ID_HEADER};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
