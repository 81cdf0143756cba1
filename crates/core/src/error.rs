//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers deterministic failures that can be detected without talking to the
/// backend (malformed input, unknown enumeration values). Transport failures
/// live in `dian-client`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank username).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty id string).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value was outside a closed enumeration.
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}
