// src/volatility.rs
//! Historical volatility estimation
//!
//! ```text
//! r_t = P_t / P_{t-1} - 1
//! σ   = stdev(r_1..r_n; n-1 denominator) * √252
//! ```
//!
//! 252 is the trading-days-per-year convention. It is independent of the
//! 365-day year used for time to maturity in [`crate::maturity`].

use crate::error::{validation::validate_positive, RiskError, RiskResult};
use statrs::statistics::Statistics;

/// Trading days per year used to annualize daily return volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple period-over-period returns for consecutive prices.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized volatility of an ordered price series.
///
/// Missing observations (NaN or infinite) are dropped before returns are
/// computed; a finite non-positive price is rejected as `InvalidInput`.
///
/// # Errors
/// `InsufficientData` if fewer than two usable prices remain or if the return
/// series has no dispersion (e.g. a constant price series). Zero volatility is
/// never returned.
pub fn annualized_volatility(prices: &[f64]) -> RiskResult<f64> {
    let usable: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    for &price in &usable {
        validate_positive("price", price)?;
    }

    if usable.len() < 2 {
        return Err(RiskError::InsufficientData {
            observations: usable.len(),
            reason: "at least two prices are required to form a return".to_string(),
        });
    }

    let returns = simple_returns(&usable);
    let daily = returns.iter().std_dev();

    // NaN when a single return is present, 0 for a constant series
    if !(daily > 0.0) || !daily.is_finite() {
        return Err(RiskError::InsufficientData {
            observations: usable.len(),
            reason: format!("return standard deviation is {}", daily),
        });
    }

    Ok(daily * TRADING_DAYS_PER_YEAR.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_series() {
        // returns: 0.02, -0.00980392..., sample stdev computed by hand
        let prices = [100.0, 102.0, 101.0];
        let r1: f64 = 0.02;
        let r2: f64 = 101.0 / 102.0 - 1.0;
        let mean = (r1 + r2) / 2.0;
        let var = ((r1 - mean).powi(2) + (r2 - mean).powi(2)) / 1.0;
        let expected = var.sqrt() * 252.0_f64.sqrt();

        let sigma = annualized_volatility(&prices).unwrap();
        assert!((sigma - expected).abs() < 1e-12, "{} vs {}", sigma, expected);
    }

    #[test]
    fn test_constant_series_is_rejected() {
        match annualized_volatility(&[100.0, 100.0, 100.0]) {
            Err(RiskError::InsufficientData { observations, .. }) => assert_eq!(observations, 3),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_too_few_prices() {
        assert!(matches!(
            annualized_volatility(&[]),
            Err(RiskError::InsufficientData { observations: 0, .. })
        ));
        assert!(matches!(
            annualized_volatility(&[100.0]),
            Err(RiskError::InsufficientData { observations: 1, .. })
        ));
        // a single return has no sample standard deviation
        assert!(matches!(
            annualized_volatility(&[100.0, 101.0]),
            Err(RiskError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_missing_values_are_dropped() {
        let with_gap = [100.0, f64::NAN, 102.0, 101.0];
        let clean = [100.0, 102.0, 101.0];
        assert_eq!(
            annualized_volatility(&with_gap).unwrap(),
            annualized_volatility(&clean).unwrap()
        );
    }

    #[test]
    fn test_non_positive_price_is_invalid() {
        assert!(matches!(
            annualized_volatility(&[100.0, 0.0, 101.0]),
            Err(RiskError::InvalidInput { .. })
        ));
    }
}
