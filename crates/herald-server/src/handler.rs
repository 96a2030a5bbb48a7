//! Action registry.
//!
//! An action is an async function from the request context and the bound
//! HTTP request to a response. Controllers register actions by name and the
//! [`Router`](crate::Router) maps method and path to those names.
//!
//! ```rust
//! use bytes::Bytes;
//! use herald_core::{HeraldResult, RequestContext};
//! use herald_extract::response::HtmlResponse;
//! use herald_extract::ExtractionContext;
//! use herald_server::ActionRegistry;
//! use http::Response;
//!
//! async fn index(_ctx: RequestContext, _req: ExtractionContext) -> HeraldResult<Response<Bytes>> {
//!     Ok(HtmlResponse::new("<h1>hi</h1>").into_response())
//! }
//!
//! let mut actions = ActionRegistry::new();
//! actions.register("home.index", index);
//! assert!(actions.contains("home.index"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use herald_core::{HeraldResult, RequestContext};
use herald_extract::ExtractionContext;
use http::Response;

/// Boxed future returned by an erased action.
pub type ActionFuture = Pin<Box<dyn Future<Output = HeraldResult<Response<Bytes>>> + Send>>;

/// Type-erased action.
pub type ErasedAction = Arc<dyn Fn(RequestContext, ExtractionContext) -> ActionFuture + Send + Sync>;

/// Registry of named actions.
#[derive(Default, Clone)]
pub struct ActionRegistry {
    actions: HashMap<String, ErasedAction>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Registers `action` under `name`, replacing any previous entry.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(RequestContext, ExtractionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeraldResult<Response<Bytes>>> + Send + 'static,
    {
        let erased: ErasedAction =
            Arc::new(move |ctx: RequestContext, req: ExtractionContext| -> ActionFuture {
                Box::pin(action(ctx, req))
            });
        self.actions.insert(name.into(), erased);
        self
    }

    /// Looks up an action by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ErasedAction> {
        self.actions.get(name)
    }

    /// Checks whether an action is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the registered action names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ActionRegistry")
            .field("actions", &names)
            .finish()
    }
}
