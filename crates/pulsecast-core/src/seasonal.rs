//! Calendar-based seasonal multipliers.
//!
//! The profile is a set of constant tables: one multiplier per month, one for
//! weekend days, and an ordered list of holiday windows. The per-point seasonal
//! annotation uses month and weekend only; holiday windows are applied solely
//! when generating synthetic series.

use chrono::{Datelike, NaiveDate, Weekday};

/// Month-of-year multipliers, indexed by 0-based month (January = 0).
///
/// Low after the holidays, rising into Q4.
pub const MONTHLY_FACTORS: [f64; 12] = [0.8, 0.7, 0.9, 1.1, 1.2, 1.3, 1.1, 1.0, 0.9, 1.1, 1.4, 1.6];

/// Multiplier applied on Saturdays and Sundays.
pub const WEEKEND_FACTOR: f64 = 0.7;

/// A range of days within one month that carries its own multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolidayWindow {
    /// 0-based month index
    pub month_index: u32,
    /// First day of the window (1-based, inclusive)
    pub first_day: u32,
    /// Last day of the window (inclusive)
    pub last_day: u32,
    pub multiplier: f64,
}

impl HolidayWindow {
    pub const fn new(month_index: u32, first_day: u32, last_day: u32, multiplier: f64) -> Self {
        Self {
            month_index,
            first_day,
            last_day,
            multiplier,
        }
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month_index
            && (self.first_day..=self.last_day).contains(&date.day())
    }
}

/// Holiday windows, checked in order; the first match wins.
pub const HOLIDAY_WINDOWS: [HolidayWindow; 5] = [
    // Black Friday through Cyber Monday
    HolidayWindow::new(10, 20, 30, 1.5),
    // December
    HolidayWindow::new(11, 1, 31, 1.8),
    // New Year sales
    HolidayWindow::new(0, 1, 5, 1.3),
    // Valentine's week
    HolidayWindow::new(1, 10, 16, 1.2),
    // Mother's Day week
    HolidayWindow::new(4, 8, 14, 1.1),
];

/// Immutable seasonal configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalProfile {
    pub monthly: [f64; 12],
    pub weekend: f64,
    pub holidays: &'static [HolidayWindow],
}

impl SeasonalProfile {
    /// Typical retail seasonality.
    pub const RETAIL: SeasonalProfile = SeasonalProfile {
        monthly: MONTHLY_FACTORS,
        weekend: WEEKEND_FACTOR,
        holidays: &HOLIDAY_WINDOWS,
    };

    /// Multiplier for a 0-based month index. Indices outside 0..12 are neutral (1.0).
    pub fn monthly_factor(&self, month_index: usize) -> f64 {
        self.monthly.get(month_index).copied().unwrap_or(1.0)
    }

    /// Weekend multiplier for `date`, 1.0 on weekdays.
    pub fn weekend_factor(&self, date: NaiveDate) -> f64 {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => self.weekend,
            _ => 1.0,
        }
    }

    /// Multiplier of the first holiday window containing `date`, 1.0 if none does.
    pub fn holiday_factor(&self, date: NaiveDate) -> f64 {
        self.holidays
            .iter()
            .find(|w| w.contains(date))
            .map(|w| w.multiplier)
            .unwrap_or(1.0)
    }

    /// Seasonal annotation of `value` on `date`: month × weekend, no holiday factor.
    pub fn seasonal_component(&self, date: NaiveDate, value: f64) -> f64 {
        value * self.monthly_factor(date.month0() as usize) * self.weekend_factor(date)
    }

    /// Full multiplier used for synthetic series: month × weekend × holiday.
    pub fn synthetic_factor(&self, date: NaiveDate) -> f64 {
        self.monthly_factor(date.month0() as usize)
            * self.weekend_factor(date)
            * self.holiday_factor(date)
    }
}

impl Default for SeasonalProfile {
    fn default() -> Self {
        Self::RETAIL
    }
}

/// English month name for a 0-based month index.
pub fn month_name(month_index: usize) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month_index).copied().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_factor_table() {
        let profile = SeasonalProfile::RETAIL;
        assert_eq!(profile.monthly_factor(0), 0.8);
        assert_eq!(profile.monthly_factor(11), 1.6);
        assert_eq!(profile.monthly_factor(12), 1.0);
    }

    #[test]
    fn test_weekend_factor() {
        let profile = SeasonalProfile::default();
        // 2024-06-01 is a Saturday, 2024-06-03 a Monday
        assert_eq!(profile.weekend_factor(date(2024, 6, 1)), 0.7);
        assert_eq!(profile.weekend_factor(date(2024, 6, 2)), 0.7);
        assert_eq!(profile.weekend_factor(date(2024, 6, 3)), 1.0);
    }

    #[test]
    fn test_holiday_windows() {
        let profile = SeasonalProfile::RETAIL;
        assert_eq!(profile.holiday_factor(date(2024, 11, 29)), 1.5);
        assert_eq!(profile.holiday_factor(date(2024, 12, 24)), 1.8);
        assert_eq!(profile.holiday_factor(date(2024, 1, 3)), 1.3);
        assert_eq!(profile.holiday_factor(date(2024, 2, 14)), 1.2);
        assert_eq!(profile.holiday_factor(date(2024, 5, 10)), 1.1);
        assert_eq!(profile.holiday_factor(date(2024, 8, 15)), 1.0);
        assert_eq!(profile.holiday_factor(date(2024, 1, 6)), 1.0);
    }

    #[test]
    fn test_seasonal_component_ignores_holidays() {
        let profile = SeasonalProfile::RETAIL;
        // Tuesday 2024-12-24: December factor only
        assert_relative_eq!(
            profile.seasonal_component(date(2024, 12, 24), 100.0),
            160.0,
            epsilon = 1e-9
        );
        // Saturday 2024-03-02: March × weekend
        assert_relative_eq!(
            profile.seasonal_component(date(2024, 3, 2), 100.0),
            100.0 * 0.9 * 0.7,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_synthetic_factor_includes_holidays() {
        let profile = SeasonalProfile::RETAIL;
        // Tuesday 2024-12-24
        assert_relative_eq!(
            profile.synthetic_factor(date(2024, 12, 24)),
            1.6 * 1.8,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(11), "December");
        assert_eq!(month_name(12), "Unknown");
    }
}
