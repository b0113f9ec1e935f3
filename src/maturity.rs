// src/maturity.rs
//! Calendar arithmetic for synthetic contracts.
//!
//! Time to maturity uses a fixed 365-day year, separate from the 252-day
//! convention of [`crate::volatility`].

use chrono::{Duration, NaiveDate};

/// Calendar days per year for year-fraction time to maturity
pub const DAYS_PER_YEAR: f64 = 365.0;

/// `(maturity - valuation in days) / 365`.
///
/// Zero when both dates coincide and negative when the maturity precedes the
/// valuation date; callers decide whether such a day is valuable.
pub fn time_to_maturity(valuation_date: NaiveDate, maturity_date: NaiveDate) -> f64 {
    maturity_date.signed_duration_since(valuation_date).num_days() as f64 / DAYS_PER_YEAR
}

/// `date + tenor_days` calendar days, `None` if the result leaves chrono's date range.
pub fn maturity_date(valuation_date: NaiveDate, tenor_days: i32) -> Option<NaiveDate> {
    valuation_date.checked_add_signed(Duration::days(i64::from(tenor_days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_year() {
        assert_eq!(time_to_maturity(date(2023, 1, 1), date(2024, 1, 1)), 1.0);
        // leap year spans 366 days
        assert!((time_to_maturity(date(2024, 1, 1), date(2025, 1, 1)) - 366.0 / 365.0).abs() < 1e-15);
    }

    #[test]
    fn test_boundaries() {
        let d = date(2023, 6, 15);
        assert_eq!(time_to_maturity(d, d), 0.0);
        assert!(time_to_maturity(d, d.pred_opt().unwrap()) < 0.0);
    }

    #[test]
    fn test_maturity_date() {
        assert_eq!(maturity_date(date(2023, 1, 2), 90), Some(date(2023, 4, 2)));
        assert_eq!(maturity_date(date(2023, 1, 2), 0), Some(date(2023, 1, 2)));
        assert_eq!(maturity_date(date(2023, 1, 2), -1), Some(date(2023, 1, 1)));
        assert_eq!(maturity_date(NaiveDate::MAX, 1), None);
    }
}
