// src/runner.rs
//! End-to-end runs: fetch prices, simulate, export.
//!
//! A run writes two identical CSV files named after the instrument stem:
//! ```text
//! <processed_dir>/<stem>_processed_data.csv
//! <exports_dir>/<stem>_options_data.csv
//! ```
//! Nothing is written unless the whole table was built, and if one export
//! fails the ones already written are removed again.

use crate::error::{RiskError, RiskResult};
use crate::market::{instrument_stem, PriceSeries, PriceSource};
use crate::output::RiskSink;
use crate::simulation::{value_series, RiskTable, RunContext, SimulationConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub instrument: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub processed_dir: PathBuf,
    pub exports_dir: PathBuf,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl RunConfig {
    pub fn new(instrument: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            instrument: instrument.to_string(),
            start,
            end,
            processed_dir: PathBuf::from("data/processed"),
            exports_dir: PathBuf::from("data/exports"),
            simulation: SimulationConfig::default(),
        }
    }

    pub fn validate(&self) -> RiskResult<()> {
        if self.instrument.trim().is_empty() {
            return Err(RiskError::InvalidConfiguration {
                field: "instrument".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.start > self.end {
            return Err(RiskError::InvalidConfiguration {
                field: "start".to_string(),
                reason: format!("{} is after end date {}", self.start, self.end),
            });
        }
        self.simulation.validate()
    }

    pub fn processed_path(&self) -> PathBuf {
        self.processed_dir
            .join(format!("{}_processed_data.csv", instrument_stem(&self.instrument)))
    }

    pub fn exports_path(&self) -> PathBuf {
        self.exports_dir
            .join(format!("{}_options_data.csv", instrument_stem(&self.instrument)))
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub table: RiskTable,
    pub sigma: f64,
    pub observations: usize,
    /// Valuation dates covered by the aligned series
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub written: Vec<PathBuf>,
}

pub struct OptionSimulator {
    config: RunConfig,
}

impl OptionSimulator {
    pub fn new(config: RunConfig) -> RiskResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fetch, simulate and persist. Source errors are returned unchanged.
    pub fn run<S, K>(&self, source: &S, sink: &K) -> RiskResult<RunReport>
    where
        S: PriceSource + ?Sized,
        K: RiskSink + ?Sized,
    {
        let cfg = &self.config;
        let quotes = source.fetch(&cfg.instrument, cfg.start, cfg.end)?;
        let series = PriceSeries::new(&cfg.instrument, quotes)?;

        let ctx = RunContext::estimate(&series, cfg.simulation.risk_free_rate)?;
        let table = value_series(&series, &cfg.simulation, &ctx, None)?;

        let written = vec![cfg.processed_path(), cfg.exports_path()];
        for (i, path) in written.iter().enumerate() {
            if let Err(e) = sink.write(&table, path) {
                discard_all(sink, &written[..i]);
                return Err(e);
            }
        }

        tracing::info!(
            instrument = %cfg.instrument,
            first = %series.first_date(),
            last = %series.last_date(),
            rows = table.len(),
            observations = series.len(),
            "run complete"
        );

        Ok(RunReport {
            table,
            sigma: ctx.sigma,
            observations: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            written,
        })
    }
}

/// Undo the exports of a run that failed before writing all of them.
fn discard_all<K: RiskSink + ?Sized>(sink: &K, paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = sink.discard(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial export");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[test]
    fn test_output_naming() {
        let cfg = RunConfig::new("PETR4.SA", date(1, 1), date(6, 30));
        assert_eq!(
            cfg.processed_path(),
            PathBuf::from("data/processed/PETR4_processed_data.csv")
        );
        assert_eq!(
            cfg.exports_path(),
            PathBuf::from("data/exports/PETR4_options_data.csv")
        );
    }

    #[test]
    fn test_validate() {
        assert!(RunConfig::new("PETR4.SA", date(1, 1), date(6, 30)).validate().is_ok());
        assert!(RunConfig::new("", date(1, 1), date(6, 30)).validate().is_err());
        assert!(OptionSimulator::new(RunConfig::new("X", date(6, 30), date(1, 1))).is_err());
    }
}
