//! Request, response and error types exchanged with the HTTP layer.

use chrono::NaiveDate;
use pulsecast_core::{ForecastError, ForecastOptions, SeasonalTrendOptions, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default forecast horizon when a request does not name one.
pub const DEFAULT_HORIZON_DAYS: usize = 30;

/// Error codes reported to the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput = 2,
    InsufficientData = 6,
    InvalidDateFormat = 7,
    InvalidParameter = 9,
    InternalError = 10,
    PanicCaught = 11,
}

impl ErrorCode {
    /// HTTP status the surrounding service should answer with.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput
            | ErrorCode::InsufficientData
            | ErrorCode::InvalidDateFormat
            | ErrorCode::InvalidParameter => 400,
            ErrorCode::InternalError | ErrorCode::PanicCaught => 500,
        }
    }
}

impl From<&ForecastError> for ErrorCode {
    fn from(e: &ForecastError) -> Self {
        match e {
            ForecastError::InvalidInput(_) => ErrorCode::InvalidInput,
            ForecastError::InsufficientData { .. } => ErrorCode::InsufficientData,
            ForecastError::InvalidDateFormat(_) => ErrorCode::InvalidDateFormat,
            ForecastError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
        }
    }
}

/// Error returned by every boundary function.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        self.code.status()
    }

    /// Whether the caller sent something wrong (4xx) rather than the engine failing (5xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        Self::new(ErrorCode::from(&e), e.to_string())
    }
}

/// A raw `{date, value}` record as sent by existing callers.
///
/// The measurement may arrive as `value` or as `actual`; `conversion` picks one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub actual: Option<serde_json::Value>,
}

/// Body of a forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub data: Vec<RawRecord>,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: usize,
}

fn default_horizon_days() -> usize {
    DEFAULT_HORIZON_DAYS
}

impl ForecastRequest {
    /// Engine options for this request.
    pub fn options(&self) -> ForecastOptions {
        ForecastOptions {
            horizon_days: self.horizon_days,
            ..Default::default()
        }
    }
}

/// Body of a standalone anomaly request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRequest {
    pub data: Vec<RawRecord>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl AnomalyRequest {
    /// Requested neighbour ratio, falling back to the engine default.
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }
}

/// Body of a seasonal-trends request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonalTrendsRequest {
    pub days: Option<usize>,
    pub horizon_days: Option<usize>,
    pub end_date: Option<NaiveDate>,
    pub seed: Option<u64>,
}

impl SeasonalTrendsRequest {
    /// Engine options for this request, defaults filled in.
    pub fn options(&self) -> SeasonalTrendOptions {
        let defaults = SeasonalTrendOptions::default();
        SeasonalTrendOptions {
            days: self.days.unwrap_or(defaults.days),
            end_date: self.end_date.unwrap_or(defaults.end_date),
            seed: self.seed,
            forecast: ForecastOptions {
                horizon_days: self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS),
                ..defaults.forecast.clone()
            },
            ..defaults
        }
    }
}
