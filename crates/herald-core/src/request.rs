//! Request objects and their handlers.
//!
//! A [`Request`] is a plain data carrier identified by its Rust type. Each
//! request type names the view model its handler produces. A
//! [`RequestHandler`] maps one validated request to that view model.

use crate::{CancellationToken, HeraldError};
use std::future::Future;
use std::marker::PhantomData;

/// A typed request object.
///
/// The associated `Response` is the view model produced by the request's
/// handler.
///
/// # Example
///
/// ```
/// use herald_core::Request;
///
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = &'static str;
/// }
/// ```
pub trait Request: Send + 'static {
    /// The view model produced when this request is handled.
    type Response: Send + 'static;
}

/// Handles exactly one request type.
///
/// Handlers receive the request after validation has passed, along with the
/// call's [`CancellationToken`]. They should be deterministic and free of
/// side effects beyond producing their view model.
///
/// # Example
///
/// ```
/// use herald_core::{CancellationToken, HeraldResult, Request, RequestHandler};
///
/// struct Shout(String);
///
/// impl Request for Shout {
///     type Response = String;
/// }
///
/// struct ShoutHandler;
///
/// impl RequestHandler for ShoutHandler {
///     type Request = Shout;
///
///     async fn handle(&self, request: Shout, _cancel: CancellationToken) -> HeraldResult<String> {
///         Ok(request.0.to_uppercase())
///     }
/// }
/// ```
pub trait RequestHandler: Send + Sync + 'static {
    /// The request type this handler accepts.
    type Request: Request;

    /// Handles a request and returns its view model.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError`] if the handler cannot produce a view model.
    /// The mediator passes the error through unmodified.
    fn handle(
        &self,
        request: Self::Request,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<<Self::Request as Request>::Response, HeraldError>> + Send;
}

/// A function-based handler wrapper.
///
/// Lets a plain async function be registered with the mediator.
///
/// # Example
///
/// ```
/// use herald_core::{CancellationToken, FnHandler, HeraldResult, Mediator, Request};
///
/// struct Add(i32, i32);
///
/// impl Request for Add {
///     type Response = i32;
/// }
///
/// async fn add(request: Add, _cancel: CancellationToken) -> HeraldResult<i32> {
///     Ok(request.0 + request.1)
/// }
///
/// let mut builder = Mediator::builder();
/// builder.register_handler(FnHandler::new(add)).unwrap();
/// assert!(builder.build().contains::<Add>());
/// ```
pub struct FnHandler<F, R, Fut> {
    func: F,
    _phantom: PhantomData<fn(R) -> Fut>,
}

impl<F, R, Fut> FnHandler<F, R, Fut>
where
    F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, HeraldError>> + Send + 'static,
    R: Request,
{
    /// Creates a new function-based handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self {
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, R, Fut> RequestHandler for FnHandler<F, R, Fut>
where
    F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, HeraldError>> + Send + 'static,
    R: Request,
{
    type Request = R;

    fn handle(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<R::Response, HeraldError>> + Send {
        (self.func)(request, cancel)
    }
}
