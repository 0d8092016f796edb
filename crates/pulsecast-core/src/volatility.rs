//! Normalized dispersion of a series.

use statrs::statistics::Statistics;

/// Largest magnitude in `values`, or 1.0 when there is nothing to scale by.
///
/// Moments are computed on `values / scale` so squared sums stay finite for any
/// finite input.
pub(crate) fn scale_of(values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        1.0
    }
}

/// Mean and population standard deviation of `values / scale_of(values)`.
fn scaled_moments(values: &[f64]) -> (f64, f64, f64) {
    let scale = scale_of(values);
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let scaled = scaled.as_slice();
    (scaled.mean(), scaled.population_std_dev(), scale)
}

/// Population mean and standard deviation of `values`.
///
/// Returns `(0.0, 0.0)` for an empty slice so callers never see NaN.
pub(crate) fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    if values.len() == 1 {
        return (values[0], 0.0);
    }
    let (mean, std_dev, scale) = scaled_moments(values);
    (mean * scale, std_dev * scale)
}

/// Coefficient of variation in percent: population `σ / μ × 100`.
///
/// Returns 0 for fewer than two values or a zero mean. Computed on the rescaled
/// values; the ratio does not depend on scale.
///
/// # Example
/// ```
/// use pulsecast_core::volatility::volatility_percent;
/// assert_eq!(volatility_percent(&[5.0, 5.0, 5.0]), 0.0);
/// assert!((volatility_percent(&[1.0, 3.0]) - 50.0).abs() < 1e-9);
/// ```
pub fn volatility_percent(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let (mean, std_dev, _) = scaled_moments(values);
    if mean == 0.0 {
        return 0.0;
    }

    // Negative means would otherwise produce a negative score
    (std_dev / mean * 100.0).abs()
}
