//! Maps method and path to action names.
//!
//! Paths are compared segment by segment, so `/api/name` and `/api/name/`
//! resolve to the same action.
//!
//! ```rust
//! use herald_server::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/", "home.index");
//! router.add_route(Method::POST, "/api/name", "api.provide_name");
//!
//! assert_eq!(router.match_route(&Method::GET, "/"), Some("home.index"));
//! assert_eq!(router.match_route(&Method::POST, "/api/name/"), Some("api.provide_name"));
//! assert_eq!(router.match_route(&Method::GET, "/api/name"), None);
//! ```

use http::Method;

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    segments: Vec<String>,
    action: String,
}

impl Route {
    fn new(method: Method, pattern: &str, action: impl Into<String>) -> Self {
        Self {
            method,
            segments: segments(pattern).map(ToString::to_string).collect(),
            action: action.into(),
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == method && segments(path).eq(self.segments.iter().map(String::as_str))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// HTTP request router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Adds a route. The first matching route wins.
    pub fn add_route(&mut self, method: Method, pattern: impl AsRef<str>, action: impl Into<String>) {
        self.routes.push(Route::new(method, pattern.as_ref(), action));
    }

    /// Builder-style [`Router::add_route`].
    #[must_use]
    pub fn route(mut self, method: Method, pattern: impl AsRef<str>, action: impl Into<String>) -> Self {
        self.add_route(method, pattern, action);
        self
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns every action name the router can resolve to.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.action.as_str())
    }

    /// Resolves a request to an action name.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| route.matches(method, path))
            .map(|route| route.action.as_str())
    }
}
