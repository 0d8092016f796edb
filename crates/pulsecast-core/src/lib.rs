//! Forecasting and anomaly-detection engine for business metric series.
//!
//! Turns a history of `{date, value}` observations into a fitted linear trend,
//! seasonally annotated projections, a volatility score and flagged
//! peak/trough anomalies. Every entry point is a pure function over borrowed
//! input; nothing is cached between calls.

pub mod anomaly;
pub mod error;
pub mod forecast;
pub mod patterns;
pub mod seasonal;
pub mod synthetic;
pub mod trend;
pub mod types;
pub mod volatility;

// Re-exports for convenience
pub use anomaly::{
    analyze_anomalies, count_high_severity, detect_anomalies, detect_series_anomalies,
    AnomalyAlert, AnomalyKind, AnomalySummary, Severity, DEFAULT_THRESHOLD,
};
pub use error::{ForecastError, Result};
pub use forecast::{classify_trend, confidence_at, forecast, ForecastOptions, MAX_HORIZON_DAYS};
pub use patterns::{
    analyze_seasonal_pattern, recommendations, seasonal_trends_with_forecast, MonthlyAverage,
    SeasonalPattern, SeasonalTrendOptions, SeasonalTrendReport,
};
pub use seasonal::{month_name, HolidayWindow, SeasonalProfile};
pub use synthetic::{generate_series, MAX_SYNTHETIC_DAYS};
pub use trend::{r_squared, LinearTrend};
pub use types::{
    ForecastResult, Observation, RegressionSummary, TimeSeriesPoint, TrendDirection,
};
pub use volatility::volatility_percent;
