//! Accepts the visitor's name.

use herald_core::validation::{CascadeMode, RuleSet};
use herald_core::{CancellationToken, HeraldResult, Request, RequestHandler};
use serde::{Deserialize, Serialize};

/// Shortest accepted name, in characters.
pub const MIN_NAME_LENGTH: usize = 5;

/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 50;

const EMPTY_NAME_MESSAGE: &str = "'Name' should not be empty.";

/// Submits a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProvideName {
    /// The submitted name.
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

impl ProvideName {
    /// Creates a submission of `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Request for ProvideName {
    type Response = ProvideNameViewModel;
}

/// The accepted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvideNameViewModel {
    /// The name as submitted.
    pub name: Option<String>,
}

/// Echoes the submitted name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvideNameHandler;

impl RequestHandler for ProvideNameHandler {
    type Request = ProvideName;

    async fn handle(
        &self,
        request: ProvideName,
        _cancel: CancellationToken,
    ) -> HeraldResult<ProvideNameViewModel> {
        Ok(ProvideNameViewModel { name: request.name })
    }
}

fn name(request: &ProvideName) -> Option<&str> {
    request.name.as_deref()
}

/// Rules for [`ProvideName`].
///
/// A single chain on `Name` that stops at the first failure, so an empty
/// name reports only that it is empty.
#[must_use]
pub fn validator() -> RuleSet<ProvideName> {
    RuleSet::new().rule_for("Name", name, |rules| {
        rules
            .cascade(CascadeMode::StopOnFirstFailure)
            .not_empty()
            .with_message(EMPTY_NAME_MESSAGE)
            .not_whitespace()
            .with_message(EMPTY_NAME_MESSAGE)
            .min_length(MIN_NAME_LENGTH)
            .max_length(MAX_NAME_LENGTH)
    })
}
