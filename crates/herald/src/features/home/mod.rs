//! The home page features.

pub mod provide_name;
pub mod welcome_message;

pub use provide_name::{ProvideName, ProvideNameHandler, ProvideNameViewModel};
pub use welcome_message::{WelcomeMessage, WelcomeMessageHandler, WelcomeMessageViewModel};
