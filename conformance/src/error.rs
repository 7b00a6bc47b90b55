//! Validation errors.

use thiserror::Error;

/// An integrity rule is violated; the cube must not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("integrity rule `{rule}` violated")]
pub struct ValidationError {
    /// Public identifier of the first violated rule.
    pub rule: String,
}
