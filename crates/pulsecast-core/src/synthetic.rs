//! Synthetic daily series for demos and tests.

use crate::error::{ForecastError, Result};
use crate::seasonal::SeasonalProfile;
use crate::types::Observation;
use chrono::{Days, NaiveDate};
use rand::Rng;

/// Level of the first generated day.
pub const BASE_LEVEL: f64 = 1000.0;

/// Deterministic growth added per day.
pub const DAILY_GROWTH: f64 = 2.0;

/// Maximum relative noise, applied as `1 + U(-NOISE, NOISE)`.
pub const NOISE: f64 = 0.1;

/// Longest synthetic history, in days (ten years).
pub const MAX_SYNTHETIC_DAYS: usize = 3660;

/// Generate `days` daily observations ending on `end_date`.
///
/// Each value is `(BASE_LEVEL + DAILY_GROWTH * i) * synthetic_factor(date) * (1 + noise)`,
/// where the synthetic factor includes holiday windows.
///
/// # Errors
/// `InvalidParameter` if `days` exceeds [`MAX_SYNTHETIC_DAYS`] or the series would
/// start before the supported calendar.
pub fn generate_series<R: Rng>(
    end_date: NaiveDate,
    days: usize,
    profile: &SeasonalProfile,
    rng: &mut R,
) -> Result<Vec<Observation>> {
    if days == 0 {
        return Ok(Vec::new());
    }
    if days > MAX_SYNTHETIC_DAYS {
        return Err(ForecastError::InvalidParameter {
            param: "days".to_string(),
            value: days.to_string(),
            reason: format!("must be at most {}", MAX_SYNTHETIC_DAYS),
        });
    }

    let start = end_date
        .checked_sub_days(Days::new(days as u64 - 1))
        .ok_or_else(|| ForecastError::InvalidParameter {
            param: "days".to_string(),
            value: days.to_string(),
            reason: format!("series would start before the supported calendar (ends {})", end_date),
        })?;

    let series = (0..days)
        .filter_map(|i| start.checked_add_days(Days::new(i as u64)).map(|d| (i, d)))
        .map(|(i, date)| {
            let base = BASE_LEVEL + DAILY_GROWTH * i as f64;
            let noise = rng.gen_range(-NOISE..=NOISE);
            Observation::new(date, base * profile.synthetic_factor(date) * (1.0 + noise))
        })
        .collect();

    Ok(series)
}
