//! Month-of-year pattern analysis and qualitative recommendations.

use crate::anomaly::count_high_severity;
use crate::error::Result;
use crate::forecast::{forecast, ForecastOptions};
use crate::seasonal::month_name;
use crate::synthetic::generate_series;
use crate::types::{ForecastResult, Observation, TrendDirection};
use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Volatility (in percent) above which a series is considered highly volatile.
pub const HIGH_VOLATILITY_PERCENT: f64 = 50.0;

/// Average of all observations falling in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAverage {
    /// 0-based month index
    pub month: usize,
    pub month_name: String,
    pub average: f64,
    /// `average / grand_average`
    pub seasonal_factor: f64,
    /// Number of observations in the month
    pub samples: usize,
}

/// Month-of-year profile of a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPattern {
    /// Months with at least one observation, January first
    pub monthly: Vec<MonthlyAverage>,
    /// Mean of the monthly averages
    pub grand_average: f64,
    /// Month with the highest average
    pub peak_month: usize,
    /// Month with the lowest average
    pub low_month: usize,
}

/// Output of [`seasonal_trends_with_forecast`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalTrendReport {
    pub forecast: ForecastResult,
    /// `None` when no history was generated
    pub pattern: Option<SeasonalPattern>,
    pub recommendations: Vec<String>,
}

/// Options for [`seasonal_trends_with_forecast`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalTrendOptions {
    /// Length of the synthetic history in days
    pub days: usize,
    /// Last day of the synthetic history
    pub end_date: NaiveDate,
    /// Seed for the noise generator; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Volatility above which a recommendation is emitted
    pub high_volatility_percent: f64,
    /// Options of the forecast run over the synthetic history
    pub forecast: ForecastOptions,
}

impl Default for SeasonalTrendOptions {
    fn default() -> Self {
        Self {
            days: 365,
            end_date: Utc::now().date_naive(),
            seed: None,
            high_volatility_percent: HIGH_VOLATILITY_PERCENT,
            forecast: ForecastOptions::default(),
        }
    }
}

/// Average observations per calendar month (across years).
///
/// Returns `None` for an empty history.
pub fn analyze_seasonal_pattern(observations: &[Observation]) -> Option<SeasonalPattern> {
    let mut sums = [0.0_f64; 12];
    let mut counts = [0_usize; 12];

    for obs in observations {
        let m = obs.date.month0() as usize;
        sums[m] += obs.value;
        counts[m] += 1;
    }

    let averages: Vec<(usize, f64, usize)> = (0..12)
        .filter(|&m| counts[m] > 0)
        .map(|m| (m, sums[m] / counts[m] as f64, counts[m]))
        .collect();

    if averages.is_empty() {
        return None;
    }

    let grand_average = averages.iter().map(|(_, avg, _)| avg).sum::<f64>() / averages.len() as f64;

    // First month wins ties in both directions
    let mut peak = averages[0];
    let mut low = averages[0];
    for &entry in &averages[1..] {
        if entry.1 > peak.1 {
            peak = entry;
        }
        if entry.1 < low.1 {
            low = entry;
        }
    }

    let monthly = averages
        .iter()
        .map(|&(month, average, samples)| MonthlyAverage {
            month,
            month_name: month_name(month).to_string(),
            average,
            seasonal_factor: if grand_average == 0.0 {
                1.0
            } else {
                average / grand_average
            },
            samples,
        })
        .collect();

    Some(SeasonalPattern {
        monthly,
        grand_average,
        peak_month: peak.0,
        low_month: low.0,
    })
}

/// Qualitative advice derived from a forecast and, optionally, its seasonal pattern.
pub fn recommendations(
    result: &ForecastResult,
    pattern: Option<&SeasonalPattern>,
    high_volatility_percent: f64,
) -> Vec<String> {
    let mut advice = Vec::new();

    advice.push(
        match result.trend_direction {
            TrendDirection::Increasing => {
                "Upward trend: plan inventory and capacity for continued growth"
            }
            TrendDirection::Decreasing => {
                "Downward trend: review acquisition and retention drivers"
            }
            TrendDirection::Stable => "Stable trend: focus on efficiency and margin improvements",
        }
        .to_string(),
    );

    if result.volatility_percent > high_volatility_percent {
        advice.push(format!(
            "High volatility ({:.1}%): keep safety stock and revisit forecasts frequently",
            result.volatility_percent
        ));
    }

    let high = count_high_severity(&result.anomalies);
    if high > 0 {
        advice.push(format!(
            "{} high-severity anomalies detected: investigate their root causes",
            high
        ));
    }

    if let Some(pattern) = pattern {
        advice.push(format!(
            "Seasonal peak in {}: prepare campaigns and staffing ahead of it",
            month_name(pattern.peak_month)
        ));
        if pattern.low_month != pattern.peak_month {
            advice.push(format!(
                "Lowest activity in {}: schedule promotions or maintenance then",
                month_name(pattern.low_month)
            ));
        }
    }

    advice
}

/// Generate a synthetic seasonal history, forecast it, and summarise its
/// month-of-year pattern with recommendations.
pub fn seasonal_trends_with_forecast(options: &SeasonalTrendOptions) -> Result<SeasonalTrendReport> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let history = generate_series(
        options.end_date,
        options.days,
        &options.forecast.profile,
        &mut rng,
    )?;

    let result = forecast(&history, &options.forecast)?;
    let pattern = analyze_seasonal_pattern(&history);
    let advice = recommendations(&result, pattern.as_ref(), options.high_volatility_percent);

    debug!(
        days = options.days,
        peak_month = pattern.as_ref().map(|p| p.peak_month),
        recommendations = advice.len(),
        "seasonal trend report built"
    );

    Ok(SeasonalTrendReport {
        forecast: result,
        pattern,
        recommendations: advice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{AnomalyAlert, AnomalyKind, Severity};
    use crate::types::RegressionSummary;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn result_with(direction: TrendDirection, volatility: f64, high: usize) -> ForecastResult {
        let anomalies = (0..high)
            .map(|i| AnomalyAlert {
                date: date(2024, 1, 1 + i as u32),
                value: 100.0,
                kind: AnomalyKind::Peak,
                severity: Severity::High,
                message: String::new(),
            })
            .collect();
        ForecastResult {
            series: Vec::new(),
            anomalies,
            volatility_percent: volatility,
            trend_direction: direction,
            overall_confidence: 0.5,
            regression: RegressionSummary::default(),
        }
    }

    #[test]
    fn test_monthly_averages_and_factors() {
        let observations = vec![
            Observation::new(date(2023, 1, 10), 10.0),
            Observation::new(date(2024, 1, 10), 30.0),
            Observation::new(date(2024, 6, 1), 40.0),
            Observation::new(date(2024, 12, 1), 60.0),
        ];
        let pattern = analyze_seasonal_pattern(&observations).unwrap();

        assert_eq!(pattern.monthly.len(), 3);
        assert_eq!(pattern.monthly[0].month, 0);
        assert_eq!(pattern.monthly[0].samples, 2);
        assert_relative_eq!(pattern.monthly[0].average, 20.0, epsilon = 1e-12);
        assert_relative_eq!(pattern.grand_average, 40.0, epsilon = 1e-12);
        assert_relative_eq!(pattern.monthly[2].seasonal_factor, 1.5, epsilon = 1e-12);
        assert_eq!(pattern.peak_month, 11);
        assert_eq!(pattern.low_month, 0);
        assert_eq!(pattern.monthly[2].month_name, "December");
    }

    #[test]
    fn test_empty_history_has_no_pattern() {
        assert!(analyze_seasonal_pattern(&[]).is_none());
    }

    #[test]
    fn test_zero_grand_average_keeps_neutral_factors() {
        let observations = vec![
            Observation::new(date(2024, 1, 1), 0.0),
            Observation::new(date(2024, 2, 1), 0.0),
        ];
        let pattern = analyze_seasonal_pattern(&observations).unwrap();
        assert!(pattern.monthly.iter().all(|m| m.seasonal_factor == 1.0));
    }

    #[test]
    fn test_recommendations_by_trend() {
        let up = recommendations(&result_with(TrendDirection::Increasing, 10.0, 0), None, 50.0);
        assert_eq!(up.len(), 1);
        assert!(up[0].starts_with("Upward trend"));

        let down = recommendations(&result_with(TrendDirection::Decreasing, 10.0, 0), None, 50.0);
        assert!(down[0].starts_with("Downward trend"));

        let flat = recommendations(&result_with(TrendDirection::Stable, 10.0, 0), None, 50.0);
        assert!(flat[0].starts_with("Stable trend"));
    }

    #[test]
    fn test_recommendations_volatility_and_anomalies() {
        let advice = recommendations(&result_with(TrendDirection::Stable, 75.0, 2), None, 50.0);
        assert_eq!(advice.len(), 3);
        assert!(advice[1].starts_with("High volatility (75.0%)"));
        assert!(advice[2].starts_with("2 high-severity anomalies"));

        // Exactly at the threshold does not count as high
        let advice = recommendations(&result_with(TrendDirection::Stable, 50.0, 0), None, 50.0);
        assert_eq!(advice.len(), 1);
    }

    #[test]
    fn test_recommendations_with_pattern() {
        let pattern = SeasonalPattern {
            monthly: Vec::new(),
            grand_average: 1.0,
            peak_month: 11,
            low_month: 1,
        };
        let advice = recommendations(
            &result_with(TrendDirection::Stable, 0.0, 0),
            Some(&pattern),
            50.0,
        );
        assert!(advice.iter().any(|a| a.contains("December")));
        assert!(advice.iter().any(|a| a.contains("February")));
    }

    #[test]
    fn test_seasonal_trends_report() {
        let options = SeasonalTrendOptions {
            days: 365,
            end_date: date(2024, 12, 31),
            seed: Some(42),
            forecast: ForecastOptions {
                horizon_days: 14,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = seasonal_trends_with_forecast(&options).unwrap();

        assert_eq!(report.forecast.series.len(), 365 + 14);
        let pattern = report.pattern.as_ref().unwrap();
        assert_eq!(pattern.monthly.len(), 12);
        // December carries both the highest month and holiday multipliers
        assert_eq!(pattern.peak_month, 11);
        assert_eq!(pattern.low_month, 1);
        assert!(!report.recommendations.is_empty());

        // Same seed, same report
        let again = seasonal_trends_with_forecast(&options).unwrap();
        assert_eq!(report, again);
    }

    #[test]
    fn test_seasonal_trends_zero_days() {
        let options = SeasonalTrendOptions {
            days: 0,
            end_date: date(2024, 12, 31),
            seed: Some(1),
            ..Default::default()
        };
        let report = seasonal_trends_with_forecast(&options).unwrap();
        assert!(report.forecast.series.is_empty());
        assert!(report.pattern.is_none());
        assert_eq!(report.forecast.trend_direction, TrendDirection::Stable);
    }
}
