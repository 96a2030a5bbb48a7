//! Declarative validation of request objects.
//!
//! A [`RuleSet`] is an ordered list of field rule chains. Each chain reads
//! one string field from the request, runs its rules in order, and records a
//! [`ValidationFailure`] for every rule that does not hold. With
//! [`CascadeMode::StopOnFirstFailure`] the chain ends at its first failure.
//!
//! ```
//! use herald_core::validation::{CascadeMode, RuleSet, Validator};
//!
//! struct SignUp {
//!     handle: Option<String>,
//! }
//!
//! fn handle(request: &SignUp) -> Option<&str> {
//!     request.handle.as_deref()
//! }
//!
//! let rules = RuleSet::new().rule_for("Handle", handle, |rules| {
//!     rules
//!         .cascade(CascadeMode::StopOnFirstFailure)
//!         .not_empty()
//!         .min_length(3)
//! });
//!
//! let failures = rules.validate(&SignUp { handle: Some("ab".into()) });
//! assert_eq!(failures.len(), 1);
//! assert_eq!(
//!     failures.messages().next(),
//!     Some("The length of 'Handle' must be at least 3 characters. You entered 2 characters.")
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The name of the field that failed.
    pub field: String,
    /// Human-readable failure message.
    pub message: String,
}

impl ValidationFailure {
    /// Creates a new failure.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// An ordered list of validation failures.
///
/// Empty means the request is valid. A field name may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationFailures(Vec<ValidationFailure>);

impl ValidationFailures {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationFailure::new(field, message));
    }

    /// Returns `true` if there are no failures.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if there are no failures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the failures in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.0.iter()
    }

    /// Iterates over the failure messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|failure| failure.message.as_str())
    }

    /// Iterates over the failures recorded for `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationFailure> {
        self.0.iter().filter(move |failure| failure.field == field)
    }
}

impl Extend<ValidationFailure> for ValidationFailures {
    fn extend<I: IntoIterator<Item = ValidationFailure>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationFailures {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationFailures {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ValidationFailure> for ValidationFailures {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationFailures {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(field, message)| ValidationFailure::new(field, message))
            .collect()
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailures {}

/// Inspects a request object and reports field-level failures.
///
/// Validators are pure: they hold no mutable state and may run concurrently.
pub trait Validator: Send + Sync + 'static {
    /// The request type this validator inspects.
    type Request;

    /// Returns every failure found in `request`. Empty means valid.
    fn validate(&self, request: &Self::Request) -> ValidationFailures;
}

/// Controls whether a field's rule chain continues after a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadeMode {
    /// Evaluate every rule in the chain.
    #[default]
    Continue,
    /// Stop the chain at the first failing rule.
    StopOnFirstFailure,
}

type Predicate = Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>;

/// Length in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane counts as two.
fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

#[derive(Clone)]
enum RuleKind {
    NotEmpty,
    NotWhitespace,
    MinLength(usize),
    MaxLength(usize),
    Must(Predicate),
}

impl RuleKind {
    fn holds(&self, value: Option<&str>) -> bool {
        match self {
            Self::NotEmpty => value.is_some_and(|v| !v.is_empty()),
            Self::NotWhitespace => value.is_some_and(|v| !v.trim().is_empty()),
            // Missing values are left to the emptiness rules
            Self::MinLength(min) => value.map_or(true, |v| text_length(v) >= *min),
            Self::MaxLength(max) => value.map_or(true, |v| text_length(v) <= *max),
            Self::Must(predicate) => predicate(value),
        }
    }

    fn default_message(&self, field: &str, value: Option<&str>) -> String {
        let entered = value.map_or(0, text_length);
        match self {
            Self::NotEmpty => format!("'{field}' must not be empty."),
            Self::MinLength(min) => format!(
                "The length of '{field}' must be at least {min} characters. You entered {entered} characters."
            ),
            Self::MaxLength(max) => format!(
                "The length of '{field}' must be {max} characters or fewer. You entered {entered} characters."
            ),
            Self::NotWhitespace | Self::Must(_) => {
                format!("The specified condition was not met for '{field}'.")
            }
        }
    }
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEmpty => f.write_str("NotEmpty"),
            Self::NotWhitespace => f.write_str("NotWhitespace"),
            Self::MinLength(n) => f.debug_tuple("MinLength").field(n).finish(),
            Self::MaxLength(n) => f.debug_tuple("MaxLength").field(n).finish(),
            Self::Must(_) => f.write_str("Must(..)"),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    kind: RuleKind,
    message: Option<String>,
}

/// The rule chain for a single field.
///
/// Built inside [`RuleSet::rule_for`]. Rules run in the order they are added.
pub struct FieldRules<R> {
    field: String,
    accessor: fn(&R) -> Option<&str>,
    cascade: CascadeMode,
    rules: Vec<Rule>,
}

impl<R> FieldRules<R> {
    fn new(field: String, accessor: fn(&R) -> Option<&str>) -> Self {
        Self {
            field,
            accessor,
            cascade: CascadeMode::default(),
            rules: Vec::new(),
        }
    }

    /// Sets the cascade mode for this chain.
    #[must_use]
    pub fn cascade(mut self, mode: CascadeMode) -> Self {
        self.cascade = mode;
        self
    }

    /// Fails when the value is missing or the empty string.
    #[must_use]
    pub fn not_empty(self) -> Self {
        self.push(RuleKind::NotEmpty)
    }

    /// Fails when the value is missing or consists only of whitespace.
    #[must_use]
    pub fn not_whitespace(self) -> Self {
        self.push(RuleKind::NotWhitespace)
    }

    /// Fails when the value has fewer than `min` characters.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.push(RuleKind::MinLength(min))
    }

    /// Fails when the value has more than `max` characters.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.push(RuleKind::MaxLength(max))
    }

    /// Fails when `predicate` returns `false`.
    #[must_use]
    pub fn must<F>(self, predicate: F) -> Self
    where
        F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.push(RuleKind::Must(Arc::new(predicate)))
    }

    /// Replaces the message of the most recently added rule.
    ///
    /// Has no effect on a chain with no rules yet.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(message.into());
        }
        self
    }

    fn push(mut self, kind: RuleKind) -> Self {
        self.rules.push(Rule {
            kind,
            message: None,
        });
        self
    }

    fn evaluate(&self, request: &R, failures: &mut ValidationFailures) {
        let value = (self.accessor)(request);
        for rule in &self.rules {
            if rule.kind.holds(value) {
                continue;
            }
            let message = rule
                .message
                .clone()
                .unwrap_or_else(|| rule.kind.default_message(&self.field, value));
            failures.push(self.field.clone(), message);
            if self.cascade == CascadeMode::StopOnFirstFailure {
                break;
            }
        }
    }
}

impl<R> fmt::Debug for FieldRules<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("field", &self.field)
            .field("cascade", &self.cascade)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// An ordered collection of field rule chains for one request type.
pub struct RuleSet<R> {
    chains: Vec<FieldRules<R>>,
}

impl<R> RuleSet<R> {
    /// Creates an empty rule set. An empty set accepts every request.
    #[must_use]
    pub fn new() -> Self {
        Self { chains: Vec::new() }
    }

    /// Adds a rule chain for `field`, read through `accessor`.
    #[must_use]
    pub fn rule_for<F>(
        mut self,
        field: impl Into<String>,
        accessor: fn(&R) -> Option<&str>,
        configure: F,
    ) -> Self
    where
        F: FnOnce(FieldRules<R>) -> FieldRules<R>,
    {
        self.chains
            .push(configure(FieldRules::new(field.into(), accessor)));
        self
    }

    /// Returns the number of field chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if the set has no chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("chains", &self.chains)
            .finish()
    }
}

impl<R: 'static> Validator for RuleSet<R> {
    type Request = R;

    fn validate(&self, request: &R) -> ValidationFailures {
        let mut failures = ValidationFailures::new();
        for chain in &self.chains {
            chain.evaluate(request, &mut failures);
        }
        failures
    }
}
