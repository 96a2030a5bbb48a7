//! Application assembly.
//!
//! Wires the features into a [`Mediator`], the controllers into an
//! [`ActionRegistry`] and both into a [`Server`]. Everything here runs once
//! at startup; a missing handler or a broken template fails the boot
//! instead of the first request that needs it.

use std::sync::Arc;

use herald_config::{HeraldConfig, LogFormat};
use herald_core::{DispatchError, Mediator, RegistrationError};
use herald_server::{ActionRegistry, Router, Server};
use herald_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use http::Method;
use thiserror::Error;

use crate::controllers::{self, api, home};
use crate::features::home::{
    provide_name, ProvideName, ProvideNameHandler, WelcomeMessage, WelcomeMessageHandler,
};
use crate::views::{ViewError, Views};

/// Startup failure.
#[derive(Debug, Error)]
pub enum AppError {
    /// Two handlers were registered for one request type.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A feature's handler is missing from the mediator.
    #[error(transparent)]
    MissingHandler(#[from] DispatchError),

    /// A template failed to compile.
    #[error(transparent)]
    View(#[from] ViewError),
}

/// State shared by every action.
#[derive(Debug)]
pub struct AppState {
    mediator: Mediator,
    views: Views,
}

impl AppState {
    /// Builds the mediator and compiles the views.
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            mediator: build_mediator()?,
            views: Views::new()?,
        })
    }

    /// The request dispatcher.
    #[must_use]
    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    /// The compiled templates.
    #[must_use]
    pub fn views(&self) -> &Views {
        &self.views
    }
}

/// Registers every feature's handler and validators.
///
/// # Errors
///
/// Returns [`AppError`] on a duplicate registration or if a feature the
/// controllers depend on ends up without a handler.
pub fn build_mediator() -> Result<Mediator, AppError> {
    let mut builder = Mediator::builder();
    builder
        .register_handler(WelcomeMessageHandler)?
        .register_handler(ProvideNameHandler)?
        .register_validator(provide_name::validator());
    let mediator = builder.build();

    mediator.ensure_registered::<WelcomeMessage>()?;
    mediator.ensure_registered::<ProvideName>()?;

    tracing::debug!(handlers = mediator.handler_count(), "mediator built");
    Ok(mediator)
}

/// The route table.
#[must_use]
pub fn build_router() -> Router {
    Router::new()
        .route(Method::GET, "/", controllers::HOME_INDEX)
        .route(Method::POST, "/", controllers::HOME_PROVIDE_NAME)
        .route(Method::POST, "/api/name", controllers::API_PROVIDE_NAME)
        .route(Method::GET, "/api/welcome", controllers::API_WELCOME)
}

/// Binds every controller action to `state`.
#[must_use]
pub fn build_actions(state: &Arc<AppState>) -> ActionRegistry {
    let mut actions = ActionRegistry::new();

    let s = Arc::clone(state);
    actions.register(controllers::HOME_INDEX, move |ctx, req| {
        home::index(Arc::clone(&s), ctx, req)
    });

    let s = Arc::clone(state);
    actions.register(controllers::HOME_PROVIDE_NAME, move |ctx, req| {
        home::provide_name(Arc::clone(&s), ctx, req)
    });

    let s = Arc::clone(state);
    actions.register(controllers::API_PROVIDE_NAME, move |ctx, req| {
        api::provide_name(Arc::clone(&s), ctx, req)
    });

    let s = Arc::clone(state);
    actions.register(controllers::API_WELCOME, move |ctx, req| {
        api::welcome(Arc::clone(&s), ctx, req)
    });

    actions
}

/// Maps the `[server]` section onto the HTTP server's config.
#[must_use]
pub fn server_config(config: &HeraldConfig) -> herald_server::ServerConfig {
    herald_server::ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .request_timeout(config.request_timeout())
        .shutdown_timeout(config.shutdown_timeout())
        .service_name(config.telemetry.service_name.clone())
        .service_version(crate::VERSION)
        .build()
}

/// Maps the `[telemetry]` section onto the telemetry crate's config.
#[must_use]
pub fn telemetry_config(config: &HeraldConfig) -> TelemetryConfig {
    let section = &config.telemetry;

    let base = match section.logging.format {
        LogFormat::Json => LogConfig::production(),
        LogFormat::Pretty => LogConfig::development(),
    };
    let logging = LogConfig {
        enabled: section.logging.enabled,
        level: section.logging.level.clone(),
        ..base
    };

    let metrics = MetricsConfig {
        enabled: section.metrics.enabled,
        addr: section.metrics.addr.clone(),
        ..MetricsConfig::default()
    };

    TelemetryConfig::builder()
        .service_name(&section.service_name)
        .logging(logging)
        .metrics(metrics)
        .build()
}

/// Assembles the complete server.
///
/// # Errors
///
/// See [`AppError`].
pub fn build_server(config: &HeraldConfig) -> Result<Server, AppError> {
    let state = Arc::new(AppState::new()?);

    Ok(Server::builder()
        .config(server_config(config))
        .router(build_router())
        .actions(build_actions(&state))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_every_route_has_an_action() {
        let router = build_router();
        let actions = build_actions(&Arc::new(AppState::new().unwrap()));

        assert_eq!(router.route_count(), 4);
        for name in router.actions() {
            assert!(actions.contains(name), "no action for route {name}");
        }
    }

    #[test]
    fn test_mediator_knows_every_feature() {
        let mediator = build_mediator().unwrap();
        assert!(mediator.contains::<WelcomeMessage>());
        assert!(mediator.contains::<ProvideName>());
        assert_eq!(mediator.handler_count(), 2);
    }

    #[test]
    fn test_server_config_mapping() {
        let mut config = HeraldConfig::default();
        config.server.http_addr = "127.0.0.1:3000".to_string();
        config.server.request_timeout_ms = 250;
        config.telemetry.service_name = "greeter".to_string();

        let server = server_config(&config);
        assert_eq!(server.http_addr(), "127.0.0.1:3000");
        assert_eq!(server.request_timeout(), Duration::from_millis(250));
        assert_eq!(server.service_name(), "greeter");
        assert_eq!(server.service_version(), crate::VERSION);
    }

    #[test]
    fn test_telemetry_config_mapping() {
        let mut config = HeraldConfig::default();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.level = "warn".to_string();
        config.telemetry.metrics.enabled = true;

        let telemetry = telemetry_config(&config);
        assert!(!telemetry.logging.json_format);
        assert_eq!(telemetry.logging.level, "warn");
        assert_eq!(telemetry.logging.service_name, "herald");
        assert!(telemetry.metrics.enabled);
        assert_eq!(telemetry.metrics.addr, "0.0.0.0:9090");
    }
}
