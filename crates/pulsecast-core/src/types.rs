//! Input and output data model shared by the engine modules.

use crate::anomaly::AnomalyAlert;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single historical measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A point of the decorated output series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Calendar date of the point
    pub date: NaiveDate,
    /// Observed value (absent for forecast points)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    /// Trend prediction, clamped at zero
    pub predicted: f64,
    /// Seasonally adjusted value
    pub seasonal: f64,
    /// Raw value of the fitted line at this index
    pub trend: f64,
    /// Confidence score in [0.5, 1.0]
    pub confidence: f64,
    /// Whether the point lies in the forecast horizon
    pub is_forecast: bool,
}

impl TimeSeriesPoint {
    /// Point used when no model could be fitted: every component is the observation.
    pub fn observed(obs: &Observation) -> Self {
        Self {
            date: obs.date,
            actual: Some(obs.value),
            predicted: obs.value,
            seasonal: obs.value,
            trend: obs.value,
            confidence: 1.0,
            is_forecast: false,
        }
    }

    /// The value anomaly detection looks at: the observation if any, else the prediction.
    pub fn value(&self) -> f64 {
        self.actual.unwrap_or(self.predicted)
    }
}

/// Direction of the fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn name(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Fit statistics of the linear trend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionSummary {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Complete output of a forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Historical then forecast points, ascending by date
    pub series: Vec<TimeSeriesPoint>,
    /// Peaks and troughs found in `series`
    pub anomalies: Vec<AnomalyAlert>,
    /// Coefficient of variation of the history, in percent
    pub volatility_percent: f64,
    pub trend_direction: TrendDirection,
    /// `1 - volatility/100`, clamped to [0, 1]
    pub overall_confidence: f64,
    pub regression: RegressionSummary,
}

impl ForecastResult {
    /// Neutral result for histories too short to fit a trend.
    pub fn degraded(history: &[Observation]) -> Self {
        Self {
            series: history.iter().map(TimeSeriesPoint::observed).collect(),
            anomalies: Vec::new(),
            volatility_percent: 0.0,
            trend_direction: TrendDirection::Stable,
            overall_confidence: 0.0,
            regression: RegressionSummary::default(),
        }
    }

    /// Points in the forecast horizon.
    pub fn forecast_points(&self) -> impl Iterator<Item = &TimeSeriesPoint> {
        self.series.iter().filter(|p| p.is_forecast)
    }

    /// Points backed by observations.
    pub fn historical_points(&self) -> impl Iterator<Item = &TimeSeriesPoint> {
        self.series.iter().filter(|p| !p.is_forecast)
    }
}
