//! Linear trend fitted by ordinary least squares.

use crate::error::{ForecastError, Result};
use crate::volatility::scale_of;

/// A fitted straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Fit a line through `(x[i], y[i])` with the closed-form OLS estimator.
    ///
    /// # Formula
    /// slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
    /// intercept = (Σy − slope·Σx) / n
    ///
    /// `y` is divided by its largest magnitude before the sums are formed, so
    /// the products stay finite for any finite input.
    ///
    /// # Errors
    /// `InvalidInput` if the slices differ in length, `InsufficientData` for
    /// fewer than two points.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ForecastError::InvalidInput(format!(
                "x and y must have the same length: {} vs {}",
                x.len(),
                y.len()
            )));
        }

        let n = x.len();
        if n < 2 {
            return Err(ForecastError::InsufficientData { needed: 2, got: n });
        }

        let nf = n as f64;
        let scale = scale_of(y);
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;

        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let yi = yi / scale;
            sum_x += xi;
            sum_y += yi;
            sum_xy += xi * yi;
            sum_xx += xi * xi;
        }

        let denominator = nf * sum_xx - sum_x * sum_x;
        // All-equal x leaves the slope undetermined; a flat line through the mean is the
        // least-squares answer among those.
        let slope = if denominator.abs() <= f64::EPSILON * nf * sum_xx {
            0.0
        } else {
            (nf * sum_xy - sum_x * sum_y) / denominator
        };
        let intercept = (sum_y - slope * sum_x) / nf;

        Ok(Self {
            slope: slope * scale,
            intercept: intercept * scale,
        })
    }

    /// Fit against the sequential index `0..n-1`.
    pub fn fit_sequential(y: &[f64]) -> Result<Self> {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        Self::fit(&x, y)
    }

    /// Value of the line at `x`.
    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Coefficient of determination of `fitted` against `actual`.
///
/// For a constant `actual` (zero total variance) the fit is perfect (1.0) when
/// every residual is zero and worthless (0.0) otherwise, so the result is never NaN.
/// Both series are divided by their common largest magnitude first; the ratio is
/// unchanged and the squared sums cannot overflow.
pub fn r_squared(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    if actual.len() != fitted.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and fitted arrays must have the same length: {} vs {}",
            actual.len(),
            fitted.len()
        )));
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    let scale = scale_of(actual).max(scale_of(fitted));
    let mean = actual.iter().map(|a| a / scale).sum::<f64>() / actual.len() as f64;

    let ss_res: f64 = actual
        .iter()
        .zip(fitted.iter())
        .map(|(a, f)| (a / scale - f / scale).powi(2))
        .sum();

    let ss_tot: f64 = actual.iter().map(|a| (a / scale - mean).powi(2)).sum();

    if ss_tot.abs() < f64::EPSILON {
        return Ok(if ss_res.abs() < f64::EPSILON { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}
