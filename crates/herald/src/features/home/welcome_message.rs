//! Greets the visitor by name.

use herald_core::{CancellationToken, HeraldResult, Request, RequestHandler};
use serde::{Deserialize, Serialize};

/// Asks for the welcome line shown on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WelcomeMessage {
    /// The visitor's name, if they gave one.
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

impl WelcomeMessage {
    /// Creates a request for `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Creates a request with no name.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl Request for WelcomeMessage {
    type Response = WelcomeMessageViewModel;
}

/// The welcome line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessageViewModel {
    /// Display-ready message.
    pub message: String,
}

/// Builds the welcome line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelcomeMessageHandler;

impl RequestHandler for WelcomeMessageHandler {
    type Request = WelcomeMessage;

    async fn handle(
        &self,
        request: WelcomeMessage,
        _cancel: CancellationToken,
    ) -> HeraldResult<WelcomeMessageViewModel> {
        let message = match request.name.as_deref() {
            None | Some("") => "Who are you?".to_string(),
            Some(name) => format!("Hello {name}"),
        };
        Ok(WelcomeMessageViewModel { message })
    }
}
