//! Trend forecast with seasonal annotation, confidence decay and anomaly scan.

use crate::anomaly::{detect_series_anomalies, DEFAULT_THRESHOLD};
use crate::error::{ForecastError, Result};
use crate::seasonal::SeasonalProfile;
use crate::trend::{r_squared, LinearTrend};
use crate::types::{
    ForecastResult, Observation, RegressionSummary, TimeSeriesPoint, TrendDirection,
};
use crate::volatility::volatility_percent;
use chrono::Days;
use tracing::{debug, warn};

/// Lowest confidence any point can carry.
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Confidence lost per unit of relative distance from the last observation.
const CONFIDENCE_DECAY: f64 = 0.8;

/// Longest accepted forecast horizon, in days (ten years).
pub const MAX_HORIZON_DAYS: usize = 3660;

/// Forecast options.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOptions {
    /// Number of days to project past the last observation
    pub horizon_days: usize,
    /// Neighbour ratio for peak/trough detection
    pub anomaly_threshold: f64,
    /// Slopes within ±tolerance are classified as stable
    pub trend_tolerance: f64,
    /// Seasonal multipliers used to annotate points
    pub profile: SeasonalProfile,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            anomaly_threshold: DEFAULT_THRESHOLD,
            trend_tolerance: 0.1,
            profile: SeasonalProfile::RETAIL,
        }
    }
}

/// Confidence of the point at `index` for a history of `n` observations.
///
/// Decays linearly with the distance from the last historical index `n - 1`
/// and is floored at 0.5. Distance counts in both directions, so old history
/// decays just like far-future points.
pub fn confidence_at(index: usize, n: usize) -> f64 {
    if n == 0 {
        return MIN_CONFIDENCE;
    }
    let distance = (index as f64 - (n - 1) as f64).abs();
    (1.0 - distance / n as f64 * CONFIDENCE_DECAY).clamp(MIN_CONFIDENCE, 1.0)
}

/// Classify a slope as increasing, decreasing or stable.
pub fn classify_trend(slope: f64, tolerance: f64) -> TrendDirection {
    if slope > tolerance {
        TrendDirection::Increasing
    } else if slope < -tolerance {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn horizon_error(horizon_days: usize, reason: String) -> ForecastError {
    ForecastError::InvalidParameter {
        param: "horizon_days".to_string(),
        value: horizon_days.to_string(),
        reason,
    }
}

fn validate_horizon(horizon_days: usize) -> Result<()> {
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(horizon_error(
            horizon_days,
            format!("must be at most {}", MAX_HORIZON_DAYS),
        ));
    }
    Ok(())
}

/// Reject results that overflowed to a non-finite number.
///
/// Moments are computed on rescaled values, but the line and the seasonal
/// multipliers work in the caller's units and can still exceed `f64::MAX`.
fn ensure_finite(series: &[TimeSeriesPoint], summary: &[f64]) -> Result<()> {
    let finite = summary.iter().all(|v| v.is_finite())
        && series
            .iter()
            .all(|p| p.predicted.is_finite() && p.seasonal.is_finite() && p.trend.is_finite());
    if !finite {
        return Err(ForecastError::InvalidInput(
            "values are too large to forecast without overflowing".to_string(),
        ));
    }
    Ok(())
}

fn validate_observations(history: &[Observation]) -> Result<()> {
    if let Some(bad) = history.iter().find(|o| !o.value.is_finite()) {
        return Err(ForecastError::InvalidInput(format!(
            "non-finite value {} on {}",
            bad.value, bad.date
        )));
    }
    Ok(())
}

/// Generate a trend forecast for a history of observations.
///
/// The history may be unordered; it is sorted on a private copy. Histories with
/// fewer than two observations produce the neutral [`ForecastResult::degraded`]
/// result instead of an error.
///
/// # Errors
/// * `InvalidInput` - a value is NaN/infinite, or two observations share a date
/// * `InvalidInput` - the values are so large that the projection overflows
/// * `InvalidParameter` - the anomaly threshold is not a positive number, or the
///   horizon exceeds [`MAX_HORIZON_DAYS`] or runs past the representable calendar
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use pulsecast_core::{forecast, ForecastOptions, Observation, TrendDirection};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let history: Vec<Observation> = (0..10)
///     .map(|i| Observation::new(start + chrono::Days::new(i), 100.0 * (i + 1) as f64))
///     .collect();
/// let options = ForecastOptions { horizon_days: 3, ..Default::default() };
///
/// let result = forecast(&history, &options).unwrap();
/// assert_eq!(result.trend_direction, TrendDirection::Increasing);
/// assert_eq!(result.series.len(), 13);
/// ```
pub fn forecast(history: &[Observation], options: &ForecastOptions) -> Result<ForecastResult> {
    validate_observations(history)?;
    validate_horizon(options.horizon_days)?;

    if history.len() < 2 {
        warn!(
            points = history.len(),
            "not enough history to fit a trend, returning neutral forecast"
        );
        return Ok(ForecastResult::degraded(history));
    }

    let mut sorted = history.to_vec();
    sorted.sort_by_key(|o| o.date);
    if let Some(pair) = sorted.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(ForecastError::InvalidInput(format!(
            "duplicate observation date {}",
            pair[0].date
        )));
    }

    let n = sorted.len();
    let actuals: Vec<f64> = sorted.iter().map(|o| o.value).collect();

    let model = LinearTrend::fit_sequential(&actuals)?;
    let volatility = volatility_percent(&actuals);
    let trend_direction = classify_trend(model.slope, options.trend_tolerance);

    let profile = &options.profile;
    let capacity = n.checked_add(options.horizon_days).ok_or_else(|| {
        horizon_error(options.horizon_days, "history plus horizon overflows".to_string())
    })?;
    let mut series = Vec::with_capacity(capacity);

    for (i, obs) in sorted.iter().enumerate() {
        let trend = model.predict(i as f64);
        series.push(TimeSeriesPoint {
            date: obs.date,
            actual: Some(obs.value),
            predicted: trend.max(0.0),
            seasonal: profile.seasonal_component(obs.date, obs.value),
            trend,
            confidence: confidence_at(i, n),
            is_forecast: false,
        });
    }

    let last_date = sorted[n - 1].date;
    for k in 1..=options.horizon_days {
        let date = last_date.checked_add_days(Days::new(k as u64)).ok_or_else(|| {
            horizon_error(
                options.horizon_days,
                format!("horizon runs past the supported calendar from {}", last_date),
            )
        })?;
        let index = n + k - 1;
        let trend = model.predict(index as f64);
        let predicted = trend.max(0.0);
        series.push(TimeSeriesPoint {
            date,
            actual: None,
            predicted,
            seasonal: profile.seasonal_component(date, predicted),
            trend,
            confidence: confidence_at(index, n),
            is_forecast: true,
        });
    }

    let fitted: Vec<f64> = series[..n].iter().map(|p| p.predicted).collect();
    let r2 = r_squared(&actuals, &fitted)?;
    ensure_finite(&series, &[model.slope, model.intercept, r2, volatility])?;

    let anomalies = detect_series_anomalies(&series, options.anomaly_threshold)?;

    let overall_confidence = (1.0 - volatility / 100.0).clamp(0.0, 1.0);

    debug!(
        history = n,
        horizon = options.horizon_days,
        slope = model.slope,
        intercept = model.intercept,
        r_squared = r2,
        volatility,
        anomalies = anomalies.len(),
        "forecast computed"
    );

    Ok(ForecastResult {
        series,
        anomalies,
        volatility_percent: volatility,
        trend_direction,
        overall_confidence,
        regression: RegressionSummary {
            slope: model.slope,
            intercept: model.intercept,
            r_squared: r2,
        },
    })
}
