//! Request context types.
//!
//! The [`RequestContext`] carries per-call state from the server into
//! controller actions: the request ID used for log correlation, the matched
//! action name, and the cancellation token handed to the mediator.

use crate::cancel::CancellationToken;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it convenient for log correlation.
///
/// # Example
///
/// ```
/// use herald_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-call context handed to controller actions.
///
/// # Example
///
/// ```
/// use herald_core::RequestContext;
///
/// let ctx = RequestContext::new().with_action("home.index");
/// assert_eq!(ctx.action(), Some("home.index"));
/// assert!(!ctx.cancellation().is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    action: Option<String>,
    cancellation: CancellationToken,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a new context with a fresh request ID and cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a new context with the specified request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            action: None,
            cancellation: CancellationToken::new(),
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the matched action name, if routing has happened.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns a new context with the specified action name.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Returns the cancellation token for this call.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns a new context that uses the given cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Returns the elapsed time since the call started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_new_generates_unique_ids() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2, "Each RequestId should be unique");
    }

    #[test]
    fn test_request_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_request_id_serializes_as_plain_string() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).expect("serialization should work");
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_request_context_defaults() {
        let ctx = RequestContext::new();
        assert!(ctx.action().is_none());
        assert!(!ctx.cancellation().is_cancelled());
    }

    #[test]
    fn test_request_context_shares_given_token() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new()
            .with_action("home.provide_name")
            .with_cancellation(token.clone());

        token.cancel();

        assert_eq!(ctx.action(), Some("home.provide_name"));
        assert!(ctx.cancellation().is_cancelled());
    }
}
