//! HTTP controllers.
//!
//! Controllers bind a request object from the HTTP request, hand it to the
//! mediator and turn the outcome into a response. They hold no logic of
//! their own beyond choosing the response.

pub mod api;
pub mod home;

/// `GET /`
pub const HOME_INDEX: &str = "home.index";
/// `POST /`
pub const HOME_PROVIDE_NAME: &str = "home.provide_name";
/// `POST /api/name`
pub const API_PROVIDE_NAME: &str = "api.provide_name";
/// `GET /api/welcome`
pub const API_WELCOME: &str = "api.welcome";
