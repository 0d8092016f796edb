//! Peak and trough detection.
//!
//! A point is flagged only when it stands out from both of its neighbours by the
//! ratio `threshold` *and* lies more than one standard deviation from the global
//! mean. The two tests work on different scales; both must pass.

use crate::error::{ForecastError, Result};
use crate::types::{Observation, TimeSeriesPoint};
use crate::volatility::{mean_and_std, volatility_percent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default neighbour ratio.
pub const DEFAULT_THRESHOLD: f64 = 1.5;

/// Minimum number of points before any anomaly can be reported.
pub const MIN_POINTS: usize = 3;

/// Kind of local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Peak,
    Trough,
}

/// Severity of an alert: `High` beyond two standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

/// A flagged point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAlert {
    pub date: NaiveDate,
    pub value: f64,
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub message: String,
}

/// Anomalies of a standalone series together with summary counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalySummary {
    pub anomalies: Vec<AnomalyAlert>,
    pub volatility_percent: f64,
    pub peak_count: usize,
    pub trough_count: usize,
    pub high_severity_count: usize,
}

impl AnomalySummary {
    fn from_alerts(anomalies: Vec<AnomalyAlert>, volatility_percent: f64) -> Self {
        let peak_count = anomalies
            .iter()
            .filter(|a| a.kind == AnomalyKind::Peak)
            .count();
        let trough_count = anomalies.len() - peak_count;
        let high_severity_count = count_high_severity(&anomalies);
        Self {
            anomalies,
            volatility_percent,
            peak_count,
            trough_count,
            high_severity_count,
        }
    }
}

/// Number of `High` severity alerts.
pub fn count_high_severity(anomalies: &[AnomalyAlert]) -> usize {
    anomalies
        .iter()
        .filter(|a| a.severity == Severity::High)
        .count()
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ForecastError::InvalidParameter {
            param: "threshold".to_string(),
            value: threshold.to_string(),
            reason: "must be a positive finite number".to_string(),
        });
    }
    Ok(())
}

/// Percentage distance of `value` from `mean`; 0 when the mean is 0.
fn deviation_percent(value: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        0.0
    } else {
        ((value - mean) / mean * 100.0).abs()
    }
}

/// Scan `values` (aligned with `dates`) for interior peaks and troughs.
///
/// # Arguments
/// * `dates` - Date of each value
/// * `values` - Series values, in the order they should be compared
/// * `threshold` - Neighbour ratio a point must exceed (default 1.5)
///
/// # Returns
/// Alerts in series order. Fewer than three values yield none.
pub fn detect_anomalies(
    dates: &[NaiveDate],
    values: &[f64],
    threshold: f64,
) -> Result<Vec<AnomalyAlert>> {
    if dates.len() != values.len() {
        return Err(ForecastError::InvalidInput(format!(
            "dates and values must have the same length: {} vs {}",
            dates.len(),
            values.len()
        )));
    }
    validate_threshold(threshold)?;

    if values.len() < MIN_POINTS {
        return Ok(Vec::new());
    }

    let (mean, std_dev) = mean_and_std(values);
    let mut alerts = Vec::new();

    for i in 1..values.len() - 1 {
        let (prev, value, next) = (values[i - 1], values[i], values[i + 1]);

        let is_peak = value > prev * threshold && value > next * threshold && value > mean + std_dev;
        let is_trough =
            value < prev / threshold && value < next / threshold && value < mean - std_dev;

        let pct = deviation_percent(value, mean);
        let alert = if is_peak {
            let severity = if value > mean + 2.0 * std_dev {
                Severity::High
            } else {
                Severity::Medium
            };
            Some((
                AnomalyKind::Peak,
                severity,
                format!("Peak detected: {:.2} ({:.1}% above average)", value, pct),
            ))
        } else if is_trough {
            let severity = if value < mean - 2.0 * std_dev {
                Severity::High
            } else {
                Severity::Medium
            };
            Some((
                AnomalyKind::Trough,
                severity,
                format!("Trough detected: {:.2} ({:.1}% below average)", value, pct),
            ))
        } else {
            None
        };

        if let Some((kind, severity, message)) = alert {
            alerts.push(AnomalyAlert {
                date: dates[i],
                value,
                kind,
                severity,
                message,
            });
        }
    }

    debug!(
        points = values.len(),
        mean,
        std_dev,
        threshold,
        anomalies = alerts.len(),
        "anomaly scan finished"
    );

    Ok(alerts)
}

/// Run [`detect_anomalies`] over a decorated series, using the actual value of each
/// point when present and the prediction otherwise.
pub fn detect_series_anomalies(
    series: &[TimeSeriesPoint],
    threshold: f64,
) -> Result<Vec<AnomalyAlert>> {
    let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
    let values: Vec<f64> = series.iter().map(TimeSeriesPoint::value).collect();
    detect_anomalies(&dates, &values, threshold)
}

/// Anomaly analysis of an arbitrary externally supplied series.
///
/// Works on a date-sorted copy of `observations`; the caller's slice is not
/// modified.
pub fn analyze_anomalies(observations: &[Observation], threshold: f64) -> Result<AnomalySummary> {
    if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
        return Err(ForecastError::InvalidInput(format!(
            "non-finite value {} on {}",
            bad.value, bad.date
        )));
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.date);

    let dates: Vec<NaiveDate> = sorted.iter().map(|o| o.date).collect();
    let values: Vec<f64> = sorted.iter().map(|o| o.value).collect();

    let volatility = volatility_percent(&values);
    if !volatility.is_finite() {
        return Err(ForecastError::InvalidInput(
            "values span too many orders of magnitude to score volatility".to_string(),
        ));
    }

    let anomalies = detect_anomalies(&dates, &values, threshold)?;
    Ok(AnomalySummary::from_alerts(anomalies, volatility))
}
