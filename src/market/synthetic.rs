//! Synthetic closing prices from geometric Brownian motion
//!
//! Each weekday in the requested range gets one close. Consecutive closes
//! follow the exact GBM step over one trading day:
//! ```text
//! S_{t+dt} = S_t * exp((μ - σ²/2)dt + σ√dt * Z),   dt = 1/252,  Z ~ N(0,1)
//! ```
//! The same seed, instrument and range always produce the same series.

use super::{MarketQuote, PriceSource};
use crate::error::{validation::*, RiskError, RiskResult};
use crate::volatility::TRADING_DAYS_PER_YEAR;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub seed: u64,
}

impl Default for SyntheticPriceSource {
    fn default() -> Self {
        Self {
            s0: 100.0,
            mu: 0.05,
            sigma: 0.25,
            seed: 42,
        }
    }
}

impl SyntheticPriceSource {
    pub fn new(s0: f64, mu: f64, sigma: f64, seed: u64) -> RiskResult<Self> {
        validate_positive("s0", s0)?;
        validate_finite("mu", mu)?;
        validate_positive("sigma", sigma)?;
        Ok(Self { s0, mu, sigma, seed })
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.mu - 0.5 * self.sigma * self.sigma) * dt
            + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    // different instruments get different paths under one seed
    fn instrument_seed(&self, instrument: &str) -> u64 {
        instrument
            .bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl PriceSource for SyntheticPriceSource {
    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<Vec<MarketQuote>> {
        let mut rng = StdRng::seed_from_u64(self.instrument_seed(instrument));
        let dt = 1.0 / TRADING_DAYS_PER_YEAR;

        let mut quotes = Vec::new();
        let mut current = self.s0;
        for date in start.iter_days().take_while(|d| *d <= end).filter(|d| is_weekday(*d)) {
            if !quotes.is_empty() {
                let z: f64 = StandardNormal.sample(&mut rng);
                current = self.exact_step(current, dt, z);
            }
            quotes.push(MarketQuote::new(date, current));
        }

        if quotes.is_empty() {
            return Err(RiskError::data_unavailable(
                instrument,
                format!("no trading days between {} and {}", start, end),
            ));
        }
        Ok(quotes)
    }
}
