//! Error types for the rating model
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific model failure scenarios
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid race: {reason}")]
    InvalidRace { reason: String },

    #[error("Invalid estimator input: {reason}")]
    InvalidInput { reason: String },

    #[error("Numerical failure: {reason}")]
    Numerical { reason: String },

    #[error("Inconsistent snapshot: {reason}")]
    InconsistentSnapshot { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
