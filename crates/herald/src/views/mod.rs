//! HTML views.
//!
//! Templates are compiled into the binary and rendered with `minijinja`.
//! Every template name ends in `.html`, so values are HTML-escaped.

use herald_core::HeraldError;
use minijinja::{context, Environment};
use thiserror::Error;

use crate::features::home::WelcomeMessageViewModel;

const WELCOME_TEMPLATE: &str = "welcome.html";

/// Error rendering a view.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The template failed to parse or render.
    #[error("failed to render template '{template}': {source}")]
    Render {
        /// Template name.
        template: &'static str,
        /// Underlying template error.
        #[source]
        source: minijinja::Error,
    },
}

impl From<ViewError> for HeraldError {
    fn from(error: ViewError) -> Self {
        Self::internal_with_source("Failed to render view", error)
    }
}

/// Compiled templates.
#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Render`] if a template does not parse.
    pub fn new() -> Result<Self, ViewError> {
        let mut env = Environment::new();
        env.add_template(WELCOME_TEMPLATE, include_str!("templates/welcome.html"))
            .map_err(|source| ViewError::Render {
                template: WELCOME_TEMPLATE,
                source,
            })?;
        Ok(Self { env })
    }

    /// Renders the welcome page.
    ///
    /// `errors` are listed above the form. `name` pre-fills the input.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Render`] if rendering fails.
    pub fn welcome<'a>(
        &self,
        view: &WelcomeMessageViewModel,
        name: Option<&str>,
        errors: impl IntoIterator<Item = &'a str>,
    ) -> Result<String, ViewError> {
        let errors: Vec<&str> = errors.into_iter().collect();
        let render_error = |source: minijinja::Error| ViewError::Render {
            template: WELCOME_TEMPLATE,
            source,
        };

        self.env
            .get_template(WELCOME_TEMPLATE)
            .map_err(render_error)?
            .render(context! {
                message => &view.message,
                name => name.unwrap_or_default(),
                errors => errors,
            })
            .map_err(render_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(message: &str) -> WelcomeMessageViewModel {
        WelcomeMessageViewModel {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_welcome_renders_message() {
        let html = Views::new()
            .unwrap()
            .welcome(&view("Hello Grace"), None, [])
            .unwrap();

        assert!(html.contains("<h1>Hello Grace</h1>"));
        assert!(!html.contains("validation-errors"));
    }

    #[test]
    fn test_welcome_lists_errors() {
        let html = Views::new()
            .unwrap()
            .welcome(&view("Who are you?"), Some(""), ["'Name' should not be empty."])
            .unwrap();

        assert!(html.contains("validation-errors"));
        assert!(html.contains("should not be empty"));
    }

    #[test]
    fn test_values_are_escaped() {
        let html = Views::new()
            .unwrap()
            .welcome(&view("Hello <script>"), Some("\"><b>"), [])
            .unwrap();

        assert!(html.contains("Hello &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("\"><b>"));
    }
}
