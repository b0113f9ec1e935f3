// src/simulation.rs
//! Historical risk-surface simulation
//!
//! For every observation `(date_t, S_t)` of a price series a synthetic
//! European contract is written and valued:
//! ```text
//! K_t        = S_t * (1 + markup)
//! maturity_t = date_t + tenor_days
//! T_t        = (maturity_t - date_t) / 365
//! ```
//! σ is estimated once from the whole series before any day is valued, so
//! every row of a run shares the same σ and r (see [`RunContext`]).
//!
//! A day with `T_t <= 0` (only reachable with `tenor_days <= 0`) yields no
//! row. Any kernel precondition failure aborts the whole run.

use crate::analytics::{Greeks, ValuationInputs};
use crate::error::{validation::*, RiskError, RiskResult};
use crate::market::{MarketQuote, PriceSeries};
use crate::maturity::{maturity_date, time_to_maturity, DAYS_PER_YEAR};
use crate::volatility::annualized_volatility;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub risk_free_rate: f64,
    /// Strike as a fraction above spot, K = S * (1 + strike_markup)
    pub strike_markup: f64,
    /// Calendar days from valuation date to maturity
    pub tenor_days: i32,
    /// Value independent days on the rayon pool; row order is unaffected
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            risk_free_rate: 0.08,
            strike_markup: 0.05,
            tenor_days: 90,
            parallel: false,
        }
    }
}

impl SimulationConfig {
    /// Validate the run configuration.
    ///
    /// `tenor_days` is not constrained: a non-positive tenor makes every day a
    /// skipped day. A markup of -100% or below fails later, in the strike
    /// check of the kernels.
    pub fn validate(&self) -> RiskResult<()> {
        validate_non_negative("risk_free_rate", self.risk_free_rate).map_err(|_| {
            RiskError::InvalidConfiguration {
                field: "risk_free_rate".to_string(),
                reason: format!("must be finite and >= 0, got {}", self.risk_free_rate),
            }
        })?;
        validate_finite("strike_markup", self.strike_markup).map_err(|_| {
            RiskError::InvalidConfiguration {
                field: "strike_markup".to_string(),
                reason: format!("must be finite, got {}", self.strike_markup),
            }
        })?;
        Ok(())
    }
}

/// Run-wide constants shared read-only by every valuation day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunContext {
    pub sigma: f64,
    pub rate: f64,
}

impl RunContext {
    /// Estimate σ from the full series. `InsufficientData` is fatal for the run.
    pub fn estimate(series: &PriceSeries, rate: f64) -> RiskResult<Self> {
        let sigma = annualized_volatility(&series.prices())?;
        tracing::info!(
            instrument = series.instrument(),
            observations = series.len(),
            sigma,
            "estimated annualized volatility"
        );
        Ok(Self { sigma, rate })
    }
}

/// One output row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Stock_Price")]
    pub stock_price: f64,
    #[serde(rename = "Strike_Price")]
    pub strike_price: f64,
    #[serde(rename = "Time_to_Maturity_Years")]
    pub time_to_maturity: f64,
    #[serde(rename = "Risk_Free_Rate")]
    pub risk_free_rate: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
    #[serde(rename = "Call_Price")]
    pub call_price: f64,
    #[serde(rename = "Put_Price")]
    pub put_price: f64,
    #[serde(rename = "Delta_Call")]
    pub delta_call: f64,
    #[serde(rename = "Delta_Put")]
    pub delta_put: f64,
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    #[serde(rename = "Vega")]
    pub vega: f64,
    #[serde(rename = "Theta_Call")]
    pub theta_call: f64,
    #[serde(rename = "Theta_Put")]
    pub theta_put: f64,
    #[serde(rename = "Rho_Call")]
    pub rho_call: f64,
    #[serde(rename = "Rho_Put")]
    pub rho_put: f64,
}

impl RiskRecord {
    pub fn new(date: NaiveDate, inputs: &ValuationInputs) -> Self {
        let Greeks {
            delta_call,
            delta_put,
            gamma,
            vega,
            theta_call,
            theta_put,
            rho_call,
            rho_put,
        } = inputs.greeks();

        RiskRecord {
            date,
            stock_price: inputs.spot(),
            strike_price: inputs.strike(),
            time_to_maturity: inputs.time(),
            risk_free_rate: inputs.rate(),
            volatility: inputs.sigma(),
            call_price: inputs.call_price(),
            put_price: inputs.put_price(),
            delta_call,
            delta_put,
            gamma,
            vega,
            theta_call,
            theta_put,
            rho_call,
            rho_put,
        }
    }
}

/// Rows of one run in ascending date order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskTable {
    records: Vec<RiskRecord>,
}

impl RiskTable {
    pub fn from_records(records: Vec<RiskRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RiskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RiskRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<RiskRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RiskTable {
    type Item = &'a RiskRecord;
    type IntoIter = std::slice::Iter<'a, RiskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of valuing a single observation when no fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayOutcome {
    Record(RiskRecord),
    /// Time to maturity came out non-positive; the day produces no row
    Skip { date: NaiveDate, time_to_maturity: f64 },
}

/// Value one observation under the run context.
pub fn value_day(
    quote: &MarketQuote,
    cfg: &SimulationConfig,
    ctx: &RunContext,
) -> RiskResult<DayOutcome> {
    let strike = quote.price * (1.0 + cfg.strike_markup);
    let time = match maturity_date(quote.date, cfg.tenor_days) {
        Some(maturity) => time_to_maturity(quote.date, maturity),
        // a maturity before the representable calendar is still in the past
        None if cfg.tenor_days <= 0 => f64::from(cfg.tenor_days) / DAYS_PER_YEAR,
        None => {
            return Err(RiskError::InvalidConfiguration {
                field: "tenor_days".to_string(),
                reason: format!("{} + {} days is out of range", quote.date, cfg.tenor_days),
            })
        }
    };

    if time <= 0.0 {
        return Ok(DayOutcome::Skip {
            date: quote.date,
            time_to_maturity: time,
        });
    }

    let inputs = ValuationInputs::new(quote.price, strike, time, ctx.rate, ctx.sigma)?;
    Ok(DayOutcome::Record(RiskRecord::new(quote.date, &inputs)))
}

/// Build the risk table for raw observations of `instrument`.
///
/// # Errors
/// - `EmptySeries` if `quotes` is empty
/// - `InsufficientData` if σ cannot be estimated
/// - `InvalidInput` if any day violates a kernel precondition
pub fn simulate(
    instrument: &str,
    quotes: Vec<MarketQuote>,
    cfg: &SimulationConfig,
) -> RiskResult<RiskTable> {
    let series = PriceSeries::new(instrument, quotes)?;
    simulate_series(&series, cfg)
}

/// Build the risk table for an aligned series.
pub fn simulate_series(series: &PriceSeries, cfg: &SimulationConfig) -> RiskResult<RiskTable> {
    run(series, cfg, None)
}

/// Like [`simulate_series`], checking `cancel` before each observation.
///
/// Returns `Cancelled` as soon as the flag is seen set; no table is produced.
pub fn simulate_with_cancel(
    series: &PriceSeries,
    cfg: &SimulationConfig,
    cancel: &AtomicBool,
) -> RiskResult<RiskTable> {
    run(series, cfg, Some(cancel))
}

fn run(
    series: &PriceSeries,
    cfg: &SimulationConfig,
    cancel: Option<&AtomicBool>,
) -> RiskResult<RiskTable> {
    cfg.validate()?;
    let ctx = RunContext::estimate(series, cfg.risk_free_rate)?;
    value_series(series, cfg, &ctx, cancel)
}

/// Value every observation of `series` under an already estimated context.
pub fn value_series(
    series: &PriceSeries,
    cfg: &SimulationConfig,
    ctx: &RunContext,
    cancel: Option<&AtomicBool>,
) -> RiskResult<RiskTable> {
    let processed = AtomicUsize::new(0);
    let step = |quote: &MarketQuote| -> RiskResult<DayOutcome> {
        if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
            return Err(RiskError::Cancelled {
                processed: processed.load(Ordering::Relaxed),
            });
        }
        let outcome = value_day(quote, cfg, ctx);
        processed.fetch_add(1, Ordering::Relaxed);
        outcome
    };

    // indexed collect keeps input order in both branches
    let outcomes: Vec<DayOutcome> = if cfg.parallel {
        series.quotes().par_iter().map(|q| step(q)).collect::<RiskResult<Vec<_>>>()?
    } else {
        series.quotes().iter().map(|q| step(q)).collect::<RiskResult<Vec<_>>>()?
    };

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            DayOutcome::Record(record) => records.push(record),
            DayOutcome::Skip {
                date,
                time_to_maturity,
            } => tracing::debug!(%date, time_to_maturity, "skipping day without time to maturity"),
        }
    }

    if records.len() < series.len() {
        tracing::info!(
            instrument = series.instrument(),
            skipped = series.len() - records.len(),
            "some observations produced no row"
        );
    }

    Ok(RiskTable::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let quotes = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| MarketQuote::new(start + chrono::Duration::days(i as i64), p))
            .collect();
        PriceSeries::new("TEST", quotes).unwrap()
    }

    #[test]
    fn test_value_day_derives_contract() {
        let quote = MarketQuote::new(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), 40.0);
        let ctx = RunContext {
            sigma: 0.3,
            rate: 0.08,
        };
        match value_day(&quote, &SimulationConfig::default(), &ctx).unwrap() {
            DayOutcome::Record(rec) => {
                assert!((rec.strike_price - 42.0).abs() < 1e-12);
                assert!((rec.time_to_maturity - 90.0 / 365.0).abs() < 1e-15);
                assert_eq!(rec.volatility, 0.3);
                assert_eq!(rec.risk_free_rate, 0.08);
            }
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_tenor_skips_every_day() {
        let cfg = SimulationConfig {
            tenor_days: 0,
            ..Default::default()
        };
        let table = simulate_series(&series(&[10.0, 10.5, 10.2, 10.8]), &cfg).unwrap();
        assert!(table.is_empty());

        let negative = SimulationConfig {
            tenor_days: -1,
            ..Default::default()
        };
        assert!(simulate_series(&series(&[10.0, 10.5, 10.2]), &negative)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tenor_past_calendar_start_skips() {
        let ctx = RunContext {
            sigma: 0.25,
            rate: 0.08,
        };
        let cfg = SimulationConfig {
            tenor_days: i32::MIN,
            ..Default::default()
        };
        let quote = MarketQuote::new(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), 10.0);

        match value_day(&quote, &cfg, &ctx).unwrap() {
            DayOutcome::Skip { time_to_maturity, .. } => assert!(time_to_maturity < 0.0),
            other => panic!("expected Skip, got {:?}", other),
        }
        assert!(simulate_series(&series(&[10.0, 10.5, 10.2]), &cfg)
            .unwrap()
            .is_empty());

        let far_future = SimulationConfig {
            tenor_days: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            value_day(&quote, &far_future, &ctx),
            Err(RiskError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_non_positive_strike_is_fatal() {
        let cfg = SimulationConfig {
            strike_markup: -1.0,
            ..Default::default()
        };
        match simulate_series(&series(&[10.0, 10.5, 10.2]), &cfg) {
            Err(RiskError::InvalidInput { parameter, .. }) => assert_eq!(parameter, "strike"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_series_aborts() {
        assert!(matches!(
            simulate_series(&series(&[10.0, 10.0, 10.0]), &SimulationConfig::default()),
            Err(RiskError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let cfg = SimulationConfig {
            risk_free_rate: -0.01,
            ..Default::default()
        };
        assert!(matches!(
            simulate_series(&series(&[10.0, 10.5, 10.2]), &cfg),
            Err(RiskError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_cancelled_run_produces_nothing() {
        let cancel = AtomicBool::new(true);
        match simulate_with_cancel(&series(&[10.0, 10.5, 10.2]), &SimulationConfig::default(), &cancel) {
            Err(RiskError::Cancelled { processed }) => assert_eq!(processed, 0),
            other => panic!("expected Cancelled, got {:?}", other),
        }

        let idle = AtomicBool::new(false);
        let table =
            simulate_with_cancel(&series(&[10.0, 10.5, 10.2]), &SimulationConfig::default(), &idle)
                .unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let prices: Vec<f64> = (0..200).map(|i| 50.0 + (i as f64 * 0.37).sin() * 4.0).collect();
        let s = series(&prices);
        let sequential = simulate_series(&s, &SimulationConfig::default()).unwrap();
        let parallel = simulate_series(
            &s,
            &SimulationConfig {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}
