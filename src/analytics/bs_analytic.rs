// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! For European options, this has closed-form solutions involving
//! the cumulative normal distribution function Φ(x).
//!
//! Every formula here rejects S, K, T or σ that are not strictly positive
//! with [`RiskError::InvalidInput`](crate::error::RiskError::InvalidInput)
//! before evaluating anything. Inputs whose σ√T underflows to zero, or
//! whose d₁ overflows, are rejected the same way, so a logarithm of a
//! non-positive ratio or a division by σ√T = 0 never leaks out as NaN or
//! infinity.

use crate::error::{validation::*, RiskError, RiskResult};
use crate::math_utils::norm_cdf;
use serde::Serialize;

/// The five scalars every Black-Scholes formula consumes.
///
/// Only constructible through [`ValuationInputs::new`], so a value of this
/// type always satisfies S > 0, K > 0, T > 0, σ > 0 and a finite r.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationInputs {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    sigma: f64,
}

impl ValuationInputs {
    /// # Parameters
    /// - `spot`: Current price of the underlying (S)
    /// - `strike`: Strike price (K)
    /// - `time`: Time to maturity as a year fraction (T)
    /// - `rate`: Annualized risk-free rate (r)
    /// - `sigma`: Annualized volatility (σ)
    pub fn new(spot: f64, strike: f64, time: f64, rate: f64, sigma: f64) -> RiskResult<Self> {
        validate_positive("spot", spot)?;
        validate_positive("strike", strike)?;
        validate_positive("time", time)?;
        validate_finite("rate", rate)?;
        validate_positive("sigma", sigma)?;

        let inputs = Self {
            spot,
            strike,
            time,
            rate,
            sigma,
        };

        // Each scalar can be in range while σ√T or S·σ√T underflow to zero.
        let vol_sqrt_time = inputs.vol_sqrt_time();
        if !(vol_sqrt_time.is_finite() && vol_sqrt_time > 0.0 && spot * vol_sqrt_time > 0.0) {
            return Err(RiskError::invalid_input(
                "sigma",
                sigma,
                format!("σ√T must be representable and positive (T = {})", time),
            ));
        }
        let d1 = inputs.d1();
        if !d1.is_finite() {
            return Err(RiskError::invalid_input(
                "d1",
                d1,
                "spot, strike, rate and time give a non-finite d1",
            ));
        }

        Ok(inputs)
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// σ√T
    pub(crate) fn vol_sqrt_time(&self) -> f64 {
        self.sigma * self.time.sqrt()
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    /// ```text
    /// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    /// ```
    pub fn d1(&self) -> f64 {
        ((self.spot / self.strike).ln() + (self.rate + 0.5 * self.sigma * self.sigma) * self.time)
            / self.vol_sqrt_time()
    }

    /// ```text
    /// d₂ = d₁ - σ√T
    /// ```
    pub fn d2(&self) -> f64 {
        self.d1() - self.vol_sqrt_time()
    }

    /// European call price
    ///
    /// ```text
    /// C = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
    /// ```
    pub fn call_price(&self) -> f64 {
        let d1 = self.d1();
        let d2 = d1 - self.vol_sqrt_time();
        self.spot * norm_cdf(d1) - self.strike * self.discount_factor() * norm_cdf(d2)
    }

    /// European put price
    ///
    /// ```text
    /// P = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
    /// ```
    pub fn put_price(&self) -> f64 {
        let d1 = self.d1();
        let d2 = d1 - self.vol_sqrt_time();
        self.strike * self.discount_factor() * norm_cdf(-d2) - self.spot * norm_cdf(-d1)
    }
}

/// Black-Scholes d₁ parameter
pub fn bs_d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.d1())
}

/// Black-Scholes d₂ parameter
pub fn bs_d2(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.d2())
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,T,r,σ) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `t`: Time to expiration in years
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
///
/// # Returns
/// Present value of the call option
pub fn bs_call_price(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.call_price())
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,T,r,σ) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> RiskResult<f64> {
    Ok(ValuationInputs::new(s, k, t, r, sigma)?.put_price())
}
