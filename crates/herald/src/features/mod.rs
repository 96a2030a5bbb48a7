//! Request objects, their handlers and validators, grouped by feature.
//!
//! Each feature module owns one request type, the view model its handler
//! produces, the handler itself and, where needed, a `validator()` rule set.

pub mod home;
