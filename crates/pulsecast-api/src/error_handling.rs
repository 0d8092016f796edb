//! Standardized error handling for boundary functions.
//!
//! Every public entry point runs the engine through [`api_try`], so a panic in
//! numeric code reaches the HTTP layer as a 500 instead of unwinding into it.

use crate::types::{ApiError, ErrorCode};
use pulsecast_core::ForecastError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Message reported for a caught panic. Panic payloads are not forwarded.
pub const PANIC_MESSAGE: &str = "Panic in forecasting engine";

/// Run `f`, converting engine errors and panics into [`ApiError`].
pub fn api_try<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ForecastError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::from(e)),
        Err(_) => {
            error!("panic caught at the API boundary");
            Err(ApiError::new(ErrorCode::PanicCaught, PANIC_MESSAGE))
        }
    }
}

/// Deserialize a request body, reporting malformed JSON as invalid input.
pub fn parse_body<T>(body: &str) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body)
        .map_err(|e| ApiError::new(ErrorCode::InvalidInput, format!("Invalid input: {}", e)))
}

/// Serialize a response body.
pub fn to_body<T>(value: &T) -> Result<String, ApiError>
where
    T: serde::Serialize,
{
    serde_json::to_string(value).map_err(|e| {
        ApiError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize response: {}", e),
        )
    })
}
