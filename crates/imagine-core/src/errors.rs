//! Cross-cutting error types.
//!
//! Transport and session errors live in `imagine-client` and `imagine-auth`;
//! this module only covers failures that can happen while handling wire
//! values without any I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not match any wire name of the target enum.
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },

    /// A payload failed client-side validation before being sent.
    #[error("Validation error: {0}")]
    Validation(String),
}
