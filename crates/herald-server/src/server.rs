//! HTTP server.
//!
//! One Tokio task per connection (hyper HTTP/1.1). Each request gets a
//! fresh [`RequestContext`] whose cancellation token fires when the request
//! timeout elapses or the server starts shutting down.
//!
//! Built-in endpoints: `GET /health` and `GET /ready`. Everything else is
//! resolved by the [`Router`] to a named action in the [`ActionRegistry`].
//!
//! ```rust,ignore
//! use herald_server::{ActionRegistry, Router, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), herald_server::ServerError> {
//!     let server = Server::builder()
//!         .config(ServerConfig::builder().http_addr("127.0.0.1:8080").build())
//!         .router(Router::new())
//!         .actions(ActionRegistry::new())
//!         .build();
//!
//!     server.run().await
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use herald_core::{HeraldError, HeraldResult, RequestContext, RequestId};
use herald_extract::response::{ErrorResponse, JsonResponse};
use herald_extract::ExtractionContext;
use herald_telemetry::metrics::{record_request, InFlightGuard};
use herald_telemetry::{log_request_complete, log_request_error, log_request_start};
use http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::handler::{ActionRegistry, ErasedAction};
use crate::health::{HealthCheck, ReadinessCheck};
use crate::router::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use crate::ServerError;

/// Header carrying the request ID on every response.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// HTTP response body type.
pub type ResponseBody = Full<Bytes>;

/// HTTP response type.
pub type HttpResponse = Response<ResponseBody>;

const UNMATCHED_ACTION: &str = "unmatched";

/// The Herald HTTP server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    router: Router,
    actions: ActionRegistry,
    health: HealthCheck,
    readiness: ReadinessCheck,
    shutdown: ShutdownSignal,
}

impl Server {
    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the action registry.
    #[must_use]
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Returns the readiness probe.
    #[must_use]
    pub fn readiness(&self) -> &ReadinessCheck {
        &self.readiness
    }

    /// Returns a handle that stops the server when triggered.
    #[must_use]
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Binds the configured address and serves until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.shutdown.listen_for_os_signals();
        self.serve().await
    }

    /// Binds the configured address and serves until the shutdown signal
    /// is triggered.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| ServerError::InvalidAddress(format!("{}: {e}", self.config.http_addr())))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve_with_listener(listener).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr).await {
                                tracing::error!(%remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = server.shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        server.readiness.set_ready(false);

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_ms = u64::try_from(shutdown_timeout.as_millis()).unwrap_or(u64::MAX),
            "waiting for open connections"
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(shutdown_timeout) => tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            ),
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_incoming(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = self.shutdown.recv() => {
                tracing::debug!(%remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    /// Buffers the body, up to the configured limit, and hands the request
    /// to [`Server::handle`].
    async fn handle_incoming<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let max = self.config.max_body_size();
        let body = Limited::new(body, max);

        match tokio::time::timeout(self.config.request_timeout(), body.collect()).await {
            Ok(Ok(collected)) => {
                self.handle(Request::from_parts(parts, collected.to_bytes()))
                    .await
            }
            Ok(Err(e)) if e.downcast_ref::<LengthLimitError>().is_some() => {
                tracing::warn!(max_bytes = max, path = %parts.uri.path(), "request body too large");
                let error = HeraldError::payload_too_large(format!(
                    "Request body exceeds {max} bytes"
                ));
                finish(ErrorResponse::new(&error).into_response(), RequestId::new())
            }
            Ok(Err(e)) => {
                let error = HeraldError::validation(format!("Failed to read request body: {e}"));
                finish(ErrorResponse::new(&error).into_response(), RequestId::new())
            }
            Err(_) => {
                let error = HeraldError::timeout("Timed out reading request body");
                finish(ErrorResponse::new(&error).into_response(), RequestId::new())
            }
        }
    }

    /// Handles one fully buffered request.
    ///
    /// This is the whole request pipeline minus the socket, so it can be
    /// driven directly in tests.
    pub async fn handle(&self, request: Request<Bytes>) -> HttpResponse {
        let started = Instant::now();
        let _in_flight = InFlightGuard::new();
        let ctx = RequestContext::new();
        let request_id = ctx.request_id();

        let (parts, body) = request.into_parts();
        let method = parts.method;
        let path = parts.uri.path().to_string();

        let action_name = match (method.as_str(), path.as_str()) {
            ("GET", "/health") => Some("health"),
            ("GET", "/ready") => Some("ready"),
            _ => self.router.match_route(&method, &path),
        }
        .unwrap_or(UNMATCHED_ACTION)
        .to_string();

        log_request_start!(request_id, method, path, action_name);

        let result = match action_name.as_str() {
            "health" => Ok(JsonResponse::new(self.health.status()).into_response()),
            "ready" => Ok(self.ready_response()),
            UNMATCHED_ACTION => Err(HeraldError::not_found(format!(
                "No route for {method} {path}"
            ))),
            name => match self.actions.get(name) {
                Some(action) => {
                    let extraction =
                        ExtractionContext::new(method, parts.uri, parts.headers, body);
                    self.invoke(action, ctx.with_action(name), extraction).await
                }
                None => {
                    tracing::error!(action = name, "route resolves to an unregistered action");
                    Err(HeraldError::internal(format!("No action registered for '{name}'")))
                }
            },
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                if error.status_code().is_server_error() {
                    log_request_error!(request_id, error);
                }
                ErrorResponse::new(&error)
                    .with_request_id(request_id)
                    .into_response()
            }
        };

        let status = response.status().as_u16();
        let elapsed = started.elapsed();
        record_request(&action_name, status, elapsed);
        log_request_complete!(
            request_id,
            status,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        );

        finish(response, request_id)
    }

    async fn invoke(
        &self,
        action: &ErasedAction,
        ctx: RequestContext,
        request: ExtractionContext,
    ) -> HeraldResult<Response<Bytes>> {
        let cancel = ctx.cancellation().clone();
        let timeout = self.config.request_timeout();
        let mut future = std::pin::pin!(action(ctx, request));

        let outcome = tokio::time::timeout(timeout, async {
            tokio::select! {
                result = future.as_mut() => result,
                () = self.shutdown.recv() => {
                    cancel.cancel();
                    future.as_mut().await
                }
            }
        })
        .await;

        outcome.unwrap_or_else(|_| {
            cancel.cancel();
            Err(HeraldError::timeout(format!(
                "Request exceeded {}ms",
                timeout.as_millis()
            )))
        })
    }

    fn ready_response(&self) -> Response<Bytes> {
        let status = self.readiness.status();
        let code = if status.is_ready() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        JsonResponse::new(status).with_status(code).into_response()
    }
}

fn finish(response: Response<Bytes>, request_id: RequestId) -> HttpResponse {
    let mut response = response.map(Full::new);
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<ServerConfig>,
    router: Option<Router>,
    actions: Option<ActionRegistry>,
    readiness: Option<ReadinessCheck>,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server configuration.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the router.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Sets the action registry.
    #[must_use]
    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Sets the readiness probe.
    #[must_use]
    pub fn readiness(mut self, readiness: ReadinessCheck) -> Self {
        self.readiness = Some(readiness);
        self
    }

    /// Builds the server.
    ///
    /// Routes that name an unregistered action are logged here and answer
    /// 500 at request time.
    #[must_use]
    pub fn build(self) -> Server {
        let config = self.config.unwrap_or_default();
        let router = self.router.unwrap_or_default();
        let actions = self.actions.unwrap_or_default();

        for action in router.actions().filter(|name| !actions.contains(name)) {
            tracing::warn!(action, "route points at an unregistered action");
        }

        Server {
            health: HealthCheck::new(config.service_name(), config.service_version()),
            readiness: self.readiness.unwrap_or_default(),
            shutdown: ShutdownSignal::new(),
            config,
            router,
            actions,
        }
    }
}
