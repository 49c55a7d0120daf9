//! Centralized error handling for the stacks domain layer.
//!
//! Maps every failure a store or policy check can produce to an
//! actionable error type; the API layer translates these to HTTP
//! status codes.

use thiserror::Error;

/// The primary error type for all stacks-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Resource not found (e.g. Author, Book, Post)
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Field-level validation failure. The request has no side effect.
    #[error("validation failed on field '{field}': {message}")]
    Validation { field: &'static str, message: String },

    /// Acting identity is anonymous but the operation requires one.
    #[error("authentication required")]
    Unauthorized,

    /// Acting identity is known but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g. duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g. password hashing)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// A specialized Result type for stacks domain logic.
pub type Result<T> = std::result::Result<T, CoreError>;
