//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business failures raised at the manual
/// entry boundary (validation, prices, quantities). Bad catalog rows and
/// unrecognized order lines are reported as diagnostics, not as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank customer, empty cart).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A price was unparseable or not strictly positive.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A quantity was unparseable or not strictly positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A requested catalog entry / order / row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
