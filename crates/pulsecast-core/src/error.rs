//! Error types for the forecasting engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error types for engine operations.
///
/// Degenerate-but-valid input (too few points, constant series) is never
/// reported through this type; those cases produce neutral results instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Invalid parameter '{param}' = '{value}': {reason}")]
    InvalidParameter {
        param: String,
        value: String,
        reason: String,
    },
}
