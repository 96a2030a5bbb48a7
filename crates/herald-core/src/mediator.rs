//! Request dispatch.
//!
//! The [`Mediator`] is an immutable registry mapping each request type to
//! exactly one handler and to zero or more validators. It is assembled once
//! with a [`MediatorBuilder`] at startup and then shared by cloning.
//!
//! Handlers are stored type-erased, keyed by the [`TypeId`] of the request
//! they accept. Lookups downcast back to the concrete slot for the request
//! type, so a request can only ever reach a handler declared for its exact
//! type.
//!
//! # Example
//!
//! ```
//! use herald_core::{CancellationToken, FnHandler, HeraldResult, Mediator, Request};
//!
//! struct Double(u32);
//!
//! impl Request for Double {
//!     type Response = u32;
//! }
//!
//! async fn double(request: Double, _cancel: CancellationToken) -> HeraldResult<u32> {
//!     Ok(request.0 * 2)
//! }
//!
//! # tokio_test::block_on(async {
//! let mut builder = Mediator::builder();
//! builder.register_handler(FnHandler::new(double)).unwrap();
//! let mediator = builder.build();
//!
//! let doubled = mediator.dispatch(Double(21), CancellationToken::new()).await.unwrap();
//! assert_eq!(doubled, 42);
//! # });
//! ```

use crate::validation::{ValidationFailures, Validator};
use crate::{
    CancellationToken, HeraldError, HeraldResult, Request, RequestHandler, ValidationProblemDetails,
};
use crate::metrics;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type ErasedHandler<R> = Box<
    dyn Fn(R, CancellationToken) -> BoxFuture<HeraldResult<<R as Request>::Response>> + Send + Sync,
>;

/// Error from [`Mediator::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler is registered for the request type.
    #[error("No handler registered for request type {request_type}")]
    HandlerNotFound {
        /// The Rust type name of the request.
        request_type: &'static str,
    },

    /// The handler returned an error.
    #[error(transparent)]
    Handler(#[from] HeraldError),
}

/// Error from [`Mediator::send`].
#[derive(Debug, Error)]
pub enum SendError {
    /// Validation failed; the handler was not invoked.
    #[error("Request failed validation: {0}")]
    Invalid(ValidationFailures),

    /// No handler is registered for the request type.
    #[error("No handler registered for request type {request_type}")]
    HandlerNotFound {
        /// The Rust type name of the request.
        request_type: &'static str,
    },

    /// The handler returned an error.
    #[error(transparent)]
    Handler(HeraldError),
}

impl From<DispatchError> for SendError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::HandlerNotFound { request_type } => Self::HandlerNotFound { request_type },
            DispatchError::Handler(error) => Self::Handler(error),
        }
    }
}

impl From<SendError> for HeraldError {
    fn from(error: SendError) -> Self {
        match error {
            SendError::Invalid(failures) => {
                let problem = ValidationProblemDetails::from_failures(&failures);
                Self::validation_with_details(
                    problem.detail,
                    serde_json::json!({ "errors": problem.errors }),
                )
            }
            SendError::HandlerNotFound { .. } => Self::internal(error.to_string()),
            SendError::Handler(error) => error,
        }
    }
}

impl From<DispatchError> for HeraldError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::HandlerNotFound { .. } => Self::internal(error.to_string()),
            DispatchError::Handler(error) => error,
        }
    }
}

/// Error raised while assembling a [`Mediator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A second handler was registered for the same request type.
    #[error("A handler is already registered for request type {request_type}")]
    DuplicateHandler {
        /// The Rust type name of the request.
        request_type: &'static str,
    },
}

struct HandlerSlot<R: Request> {
    invoke: ErasedHandler<R>,
    handler_name: &'static str,
}

struct ValidatorSlot<R> {
    validators: Vec<Box<dyn Validator<Request = R>>>,
}

#[derive(Default)]
struct Registry {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    validators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

/// Assembles a [`Mediator`].
///
/// # Example
///
/// ```
/// use herald_core::{CancellationToken, FnHandler, HeraldResult, Mediator, RegistrationError, Request};
///
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = ();
/// }
///
/// async fn pong(_: Ping, _: CancellationToken) -> HeraldResult<()> {
///     Ok(())
/// }
///
/// let mut builder = Mediator::builder();
/// builder.register_handler(FnHandler::new(pong)).unwrap();
///
/// let duplicate = builder.register_handler(FnHandler::new(pong));
/// assert!(matches!(duplicate, Err(RegistrationError::DuplicateHandler { .. })));
/// ```
#[derive(Default)]
pub struct MediatorBuilder {
    registry: Registry,
}

impl MediatorBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `H::Request`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateHandler`] if a handler is
    /// already registered for the same request type.
    pub fn register_handler<H: RequestHandler>(
        &mut self,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        let key = TypeId::of::<H::Request>();
        if self.registry.handlers.contains_key(&key) {
            return Err(RegistrationError::DuplicateHandler {
                request_type: type_name::<H::Request>(),
            });
        }

        let handler = Arc::new(handler);
        let invoke: ErasedHandler<H::Request> = Box::new(
            move |request: H::Request,
                  cancel: CancellationToken|
                  -> BoxFuture<HeraldResult<<H::Request as Request>::Response>> {
                let handler = Arc::clone(&handler);
                Box::pin(async move { handler.handle(request, cancel).await })
            },
        );

        self.registry.handlers.insert(
            key,
            Box::new(HandlerSlot {
                invoke,
                handler_name: type_name::<H>(),
            }),
        );
        Ok(self)
    }

    /// Adds a validator for `V::Request`.
    ///
    /// Several validators may be registered for one request type. They run
    /// in registration order.
    pub fn register_validator<V>(&mut self, validator: V) -> &mut Self
    where
        V: Validator,
        V::Request: Request,
    {
        let slot = self
            .registry
            .validators
            .entry(TypeId::of::<V::Request>())
            .or_insert_with(|| {
                Box::new(ValidatorSlot::<V::Request> {
                    validators: Vec::new(),
                })
            });

        if let Some(slot) = slot.downcast_mut::<ValidatorSlot<V::Request>>() {
            slot.validators.push(Box::new(validator));
        }
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> Mediator {
        Mediator {
            inner: Arc::new(self.registry),
        }
    }
}

impl fmt::Debug for MediatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorBuilder")
            .field("handler_count", &self.registry.handlers.len())
            .field("validated_type_count", &self.registry.validators.len())
            .finish()
    }
}

/// Immutable request-type → handler registry and dispatcher.
///
/// Cloning is cheap and every clone shares the same registry. The mediator
/// holds no per-call state, so any number of tasks may dispatch through it
/// at once.
#[derive(Clone)]
pub struct Mediator {
    inner: Arc<Registry>,
}

impl Mediator {
    /// Starts assembling a mediator.
    #[must_use]
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Hands `request` to the single handler registered for its type.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::HandlerNotFound`] if no handler is registered for
    ///   `R`. Nothing is invoked.
    /// - [`DispatchError::Handler`] with the handler's own error, unmodified.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> Result<R::Response, DispatchError> {
        let request_type = type_name::<R>();
        let Some(slot) = self.handler_slot::<R>() else {
            tracing::error!(request_type, "no handler registered for request type");
            metrics::record_dispatch(request_type, "not_found");
            return Err(DispatchError::HandlerNotFound { request_type });
        };

        tracing::debug!(request_type, handler = slot.handler_name, "dispatching request");
        let result = (slot.invoke)(request, cancel).await;
        metrics::record_dispatch(request_type, if result.is_ok() { "ok" } else { "error" });
        result.map_err(DispatchError::Handler)
    }

    /// Runs every validator registered for `R` and concatenates their
    /// failures. No validator means the request is valid.
    #[must_use]
    pub fn validate<R: Request>(&self, request: &R) -> ValidationFailures {
        let mut failures = ValidationFailures::new();
        let slot = self
            .inner
            .validators
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<ValidatorSlot<R>>());

        if let Some(slot) = slot {
            for validator in &slot.validators {
                failures.extend(validator.validate(request));
            }
        }
        failures
    }

    /// Validates `request` and dispatches it if it is valid.
    ///
    /// # Errors
    ///
    /// - [`SendError::Invalid`] with the failures when validation fails. The
    ///   handler is never invoked.
    /// - [`SendError::HandlerNotFound`] / [`SendError::Handler`] as for
    ///   [`Mediator::dispatch`].
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> Result<R::Response, SendError> {
        let failures = self.validate(&request);
        if !failures.is_valid() {
            tracing::debug!(
                request_type = type_name::<R>(),
                failures = failures.len(),
                "request failed validation"
            );
            metrics::record_validation_failures(type_name::<R>(), failures.len());
            return Err(SendError::Invalid(failures));
        }

        self.dispatch(request, cancel).await.map_err(SendError::from)
    }

    /// Returns `true` if a handler is registered for `R`.
    #[must_use]
    pub fn contains<R: Request>(&self) -> bool {
        self.inner.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Fails if no handler is registered for `R`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::HandlerNotFound`] for a missing handler.
    pub fn ensure_registered<R: Request>(&self) -> Result<(), DispatchError> {
        if self.contains::<R>() {
            Ok(())
        } else {
            Err(DispatchError::HandlerNotFound {
                request_type: type_name::<R>(),
            })
        }
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.len()
    }

    fn handler_slot<R: Request>(&self) -> Option<&HandlerSlot<R>> {
        self.inner
            .handlers
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<HandlerSlot<R>>())
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("handler_count", &self.inner.handlers.len())
            .field("validated_type_count", &self.inner.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{CascadeMode, RuleSet};
    use crate::FnHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Greet {
        name: Option<String>,
    }

    impl Greet {
        fn named(name: &str) -> Self {
            Self {
                name: Some(name.to_string()),
            }
        }
    }

    impl Request for Greet {
        type Response = String;
    }

    struct Unregistered;

    impl Request for Unregistered {
        type Response = ();
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    impl RequestHandler for CountingHandler {
        type Request = Greet;

        async fn handle(&self, request: Greet, _cancel: CancellationToken) -> HeraldResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Hello {}", request.name.unwrap_or_default()))
        }
    }

    fn greet_name(request: &Greet) -> Option<&str> {
        request.name.as_deref()
    }

    fn greet_rules() -> RuleSet<Greet> {
        RuleSet::new().rule_for("Name", greet_name, |rules| {
            rules
                .cascade(CascadeMode::StopOnFirstFailure)
                .not_empty()
                .min_length(5)
        })
    }

    fn counting_mediator() -> (Mediator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut builder = Mediator::builder();
        builder
            .register_handler(CountingHandler {
                calls: Arc::clone(&calls),
            })
            .unwrap()
            .register_validator(greet_rules());
        (builder.build(), calls)
    }

    #[tokio::test]
    async fn test_dispatch_reaches_registered_handler() {
        let (mediator, calls) = counting_mediator();

        let message = mediator
            .dispatch(Greet::named("Ada"), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(message, "Hello Ada");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_is_idempotent() {
        let (mediator, _) = counting_mediator();

        let first = mediator
            .dispatch(Greet::named("Grace"), CancellationToken::new())
            .await
            .unwrap();
        let second = mediator
            .dispatch(Greet::named("Grace"), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dispatch_unregistered_type_is_handler_not_found() {
        let (mediator, calls) = counting_mediator();

        let result = mediator
            .dispatch(Unregistered, CancellationToken::new())
            .await;

        match result {
            Err(DispatchError::HandlerNotFound { request_type }) => {
                assert!(request_type.ends_with("Unregistered"));
            }
            other => panic!("expected HandlerNotFound, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_passes_through() {
        async fn fail(_: Greet, _: CancellationToken) -> HeraldResult<String> {
            Err(HeraldError::not_found("nobody here"))
        }

        let mut builder = Mediator::builder();
        builder.register_handler(FnHandler::new(fail)).unwrap();
        let mediator = builder.build();

        let error = mediator
            .dispatch(Greet::named("Ada"), CancellationToken::new())
            .await
            .unwrap_err();

        match error {
            DispatchError::Handler(HeraldError::NotFound { message }) => {
                assert_eq!(message, "nobody here");
            }
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_passes_cancellation_to_handler() {
        async fn observe(_: Greet, cancel: CancellationToken) -> HeraldResult<String> {
            Ok(cancel.is_cancelled().to_string())
        }

        let mut builder = Mediator::builder();
        builder.register_handler(FnHandler::new(observe)).unwrap();
        let mediator = builder.build();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let observed = mediator.dispatch(Greet::named("x"), cancel).await.unwrap();
        assert_eq!(observed, "true");
    }

    #[test]
    fn test_duplicate_handler_is_rejected() {
        let mut builder = Mediator::builder();
        builder.register_handler(CountingHandler::default()).unwrap();

        let error = builder
            .register_handler(CountingHandler::default())
            .unwrap_err();

        assert!(matches!(error, RegistrationError::DuplicateHandler { .. }));
        assert!(error.to_string().contains("Greet"));
    }

    #[test]
    fn test_validate_without_validators_is_valid() {
        let mut builder = Mediator::builder();
        builder.register_handler(CountingHandler::default()).unwrap();
        let mediator = builder.build();

        assert!(mediator.validate(&Greet { name: None }).is_valid());
    }

    #[test]
    fn test_validators_run_in_registration_order() {
        let mut builder = Mediator::builder();
        builder
            .register_validator(
                RuleSet::new().rule_for("First", greet_name, |rules| {
                    rules.not_empty().with_message("first")
                }),
            )
            .register_validator(
                RuleSet::new().rule_for("Second", greet_name, |rules| {
                    rules.not_empty().with_message("second")
                }),
            );
        let mediator = builder.build();

        let failures = mediator.validate(&Greet { name: None });
        assert_eq!(failures.messages().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_send_invalid_never_invokes_handler() {
        let (mediator, calls) = counting_mediator();

        let error = mediator
            .send(Greet::named(""), CancellationToken::new())
            .await
            .unwrap_err();

        match error {
            SendError::Invalid(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures.messages().next(), Some("'Name' must not be empty."));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_invalid_converts_to_validation_error() {
        let (mediator, _calls) = counting_mediator();

        let error: HeraldError = mediator
            .send(Greet::named(""), CancellationToken::new())
            .await
            .unwrap_err()
            .into();

        assert_eq!(error.code(), "VALIDATION_ERROR");
        let envelope = serde_json::to_value(error.to_envelope(None)).unwrap();
        assert_eq!(
            envelope["error"]["details"]["errors"]["Name"][0],
            "'Name' must not be empty."
        );
    }

    #[tokio::test]
    async fn test_send_valid_dispatches() {
        let (mediator, calls) = counting_mediator();

        let message = mediator
            .send(Greet::named("Grace"), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(message, "Hello Grace");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_valid_without_handler_is_handler_not_found() {
        let mut builder = Mediator::builder();
        builder.register_validator(greet_rules());
        let mediator = builder.build();

        let error = mediator
            .send(Greet::named("Grace"), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(error, SendError::HandlerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let (mediator, calls) = counting_mediator();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let mediator = mediator.clone();
                tokio::spawn(async move {
                    mediator
                        .dispatch(Greet::named(&format!("user{i}")), CancellationToken::new())
                        .await
                })
            })
            .collect();

        for (i, task) in tasks.into_iter().enumerate() {
            let message = task.await.unwrap().unwrap();
            assert_eq!(message, format!("Hello user{i}"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_contains_and_ensure_registered() {
        let (mediator, _) = counting_mediator();

        assert!(mediator.contains::<Greet>());
        assert!(!mediator.contains::<Unregistered>());
        assert!(mediator.ensure_registered::<Greet>().is_ok());
        assert!(matches!(
            mediator.ensure_registered::<Unregistered>(),
            Err(DispatchError::HandlerNotFound { .. })
        ));
    }

    #[test]
    fn test_dispatch_error_into_herald_error() {
        let missing: HeraldError = DispatchError::HandlerNotFound {
            request_type: "Greet",
        }
        .into();
        assert_eq!(missing.status_code().as_u16(), 500);

        let passthrough: HeraldError = DispatchError::Handler(HeraldError::timeout("slow")).into();
        assert_eq!(passthrough.status_code().as_u16(), 504);
    }

    #[test]
    fn test_mediator_debug() {
        let (mediator, _) = counting_mediator();
        let debug = format!("{mediator:?}");
        assert!(debug.contains("Mediator"));
        assert!(debug.contains("handler_count: 1"));
        assert_eq!(mediator.handler_count(), 1);
    }
}
