// src/analytics/greeks.rs
//! Analytical Black-Scholes Greeks for European calls and puts
//!
//! All sensitivities reuse d₁/d₂ from [`ValuationInputs`] and share its
//! preconditions (S, K, T, σ > 0).
//!
//! # Units
//!
//! Theta and Rho are quoted **per year** and Vega per unit of volatility
//! (1.0 = 100 vol points). Nothing is rescaled to per-day or per-percent
//! internally; use [`theta_per_day`] when a daily decay figure is needed.

use super::bs_analytic::ValuationInputs;
use crate::error::{validation::validate_positive, RiskResult};
use crate::math_utils::{norm_cdf, norm_pdf};
use serde::{Deserialize, Serialize};

/// The eight sensitivities reported per valuation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    pub delta_call: f64,
    pub delta_put: f64,
    /// Shared by call and put
    pub gamma: f64,
    /// Shared by call and put
    pub vega: f64,
    pub theta_call: f64,
    pub theta_put: f64,
    pub rho_call: f64,
    pub rho_put: f64,
}

impl Greeks {
    /// Evaluate every Greek with a single d₁/d₂ computation.
    pub fn compute(inputs: &ValuationInputs) -> Self {
        let s = inputs.spot();
        let k = inputs.strike();
        let t = inputs.time();
        let r = inputs.rate();
        let sigma = inputs.sigma();

        let sqrt_t = t.sqrt();
        let d1 = inputs.d1();
        let d2 = d1 - sigma * sqrt_t;
        let pdf_d1 = norm_pdf(d1);
        let cdf_d1 = norm_cdf(d1);
        let discounted_strike = k * inputs.discount_factor();

        let decay = -s * pdf_d1 * sigma / (2.0 * sqrt_t);

        Greeks {
            delta_call: cdf_d1,
            delta_put: cdf_d1 - 1.0,
            gamma: pdf_d1 / (s * sigma * sqrt_t),
            vega: s * pdf_d1 * sqrt_t,
            theta_call: decay - r * discounted_strike * norm_cdf(d2),
            theta_put: decay + r * discounted_strike * norm_cdf(-d2),
            rho_call: discounted_strike * t * norm_cdf(d2),
            rho_put: -discounted_strike * t * norm_cdf(-d2),
        }
    }
}

impl ValuationInputs {
    /// Δ = ∂C/∂S = Φ(d₁)
    pub fn delta_call(&self) -> f64 {
        norm_cdf(self.d1())
    }

    /// Δ = ∂P/∂S = Φ(d₁) - 1
    pub fn delta_put(&self) -> f64 {
        norm_cdf(self.d1()) - 1.0
    }

    /// Γ = φ(d₁) / (S * σ * √T)
    pub fn gamma(&self) -> f64 {
        norm_pdf(self.d1()) / (self.spot() * self.vol_sqrt_time())
    }

    /// ν = S * φ(d₁) * √T
    pub fn vega(&self) -> f64 {
        self.spot() * norm_pdf(self.d1()) * self.time().sqrt()
    }

    /// Θ_call = -S*φ(d₁)*σ/(2√T) - r*K*e^(-rT)*Φ(d₂), per year
    pub fn theta_call(&self) -> f64 {
        let d1 = self.d1();
        let d2 = d1 - self.vol_sqrt_time();
        -self.spot() * norm_pdf(d1) * self.sigma() / (2.0 * self.time().sqrt())
            - self.rate() * self.strike() * self.discount_factor() * norm_cdf(d2)
    }

    /// Θ_put = -S*φ(d₁)*σ/(2√T) + r*K*e^(-rT)*Φ(-d₂), per year
    pub fn theta_put(&self) -> f64 {
        let d1 = self.d1();
        let d2 = d1 - self.vol_sqrt_time();
        -self.spot() * norm_pdf(d1) * self.sigma() / (2.0 * self.time().sqrt())
            + self.rate() * self.strike() * self.discount_factor() * norm_cdf(-d2)
    }

    /// ρ_call = K*T*e^(-rT)*Φ(d₂), per unit of rate
    pub fn rho_call(&self) -> f64 {
        self.strike() * self.time() * self.discount_factor() * norm_cdf(self.d2())
    }

    /// ρ_put = -K*T*e^(-rT)*Φ(-d₂), per unit of rate
    pub fn rho_put(&self) -> f64 {
        -self.strike() * self.time() * self.discount_factor() * norm_cdf(-self.d2())
    }

    pub fn greeks(&self) -> Greeks {
        Greeks::compute(self)
    }
}

/// Black-Scholes Delta (∂V/∂S) for a European call
///
/// # Interpretation
/// - Hedge ratio: number of shares to buy per option sold
/// - Range: [0, 1] for calls
pub fn bs_call_delta(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.delta_call())
}

/// Black-Scholes Delta for a European put, range [-1, 0]
pub fn bs_put_delta(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.delta_put())
}

/// Black-Scholes Gamma (∂²V/∂S²)
///
/// # Interpretation
/// - Rate of change of Delta w.r.t. underlying price
/// - Maximum at-the-money
/// - Same for calls and puts
pub fn bs_gamma(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.gamma())
}

/// Black-Scholes Vega (∂V/∂σ), same for calls and puts
pub fn bs_vega(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.vega())
}

/// Black-Scholes Theta (∂V/∂t) for a European call, per year
pub fn bs_call_theta(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.theta_call())
}

/// Black-Scholes Theta (∂V/∂t) for a European put, per year
pub fn bs_put_theta(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.theta_put())
}

/// Black-Scholes Rho (∂V/∂r) for a European call
pub fn bs_call_rho(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.rho_call())
}

/// Black-Scholes Rho (∂V/∂r) for a European put
pub fn bs_put_rho(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.rho_put())
}

/// Convert a per-year theta into decay per day for a `days_per_year` convention
/// (365 calendar days or 252 trading days are both common).
pub fn theta_per_day(theta_per_year: f64, days_per_year: f64) -> RiskResult<f64> {
    validate_positive("days_per_year", days_per_year)?;
    Ok(theta_per_year / days_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_matches_individual_formulas() {
        let inputs = ValuationInputs::new(37.5, 39.375, 90.0 / 365.0, 0.08, 0.31).unwrap();
        let g = inputs.greeks();

        assert!((g.delta_call - inputs.delta_call()).abs() < 1e-14);
        assert!((g.delta_put - inputs.delta_put()).abs() < 1e-14);
        assert!((g.gamma - inputs.gamma()).abs() < 1e-14);
        assert!((g.vega - inputs.vega()).abs() < 1e-12);
        assert!((g.theta_call - inputs.theta_call()).abs() < 1e-12);
        assert!((g.theta_put - inputs.theta_put()).abs() < 1e-12);
        assert!((g.rho_call - inputs.rho_call()).abs() < 1e-12);
        assert!((g.rho_put - inputs.rho_put()).abs() < 1e-12);
    }

    #[test]
    fn test_put_reference_values() {
        let g = ValuationInputs::new(100.0, 100.0, 1.0, 0.05, 0.20)
            .unwrap()
            .greeks();

        assert!((g.theta_put - (-1.657880423934626)).abs() < 1e-6);
        assert!((g.rho_put - (-41.89046090469506)).abs() < 1e-6);
    }

    #[test]
    fn test_theta_per_day() {
        let theta = bs_call_theta(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
        let daily = theta_per_day(theta, 365.0).unwrap();
        assert!((daily * 365.0 - theta).abs() < 1e-12);
        assert!(theta_per_day(theta, 0.0).is_err());
    }

    #[test]
    fn test_greeks_reject_zero_time() {
        assert!(bs_gamma(100.0, 100.0, 0.0, 0.05, 0.2).is_err());
        assert!(bs_put_rho(100.0, 100.0, 1.0, 0.05, -0.2).is_err());
    }
}
