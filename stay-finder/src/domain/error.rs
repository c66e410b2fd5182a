//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from provider/IO errors.

/// Domain-level errors for identifier and time validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An identifier was empty or whitespace
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// A wall-clock time was not in `HH:MM` form
    #[error("invalid clock time: {0:?}")]
    InvalidClockTime(String),
}
