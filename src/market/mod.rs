//! Historical closing prices and the sources that provide them.

pub mod csv_source;
pub mod synthetic;

use crate::error::{validation::validate_positive, RiskError, RiskResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use csv_source::CsvPriceSource;
pub use synthetic::SyntheticPriceSource;

/// Exchange suffixes stripped from instrument identifiers when naming files
pub const EXCHANGE_SUFFIXES: &[&str] = &[".SA"];

/// One closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub date: NaiveDate,
    pub price: f64,
}

impl MarketQuote {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Closing prices ordered strictly ascending by date, one per date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    instrument: String,
    quotes: Vec<MarketQuote>,
}

impl PriceSeries {
    /// Align raw observations: sort by date, keep the last observation of a
    /// duplicated date and drop missing (non-finite) prices.
    ///
    /// # Errors
    /// - `EmptySeries` if nothing remains
    /// - `InvalidInput` for a finite price that is not strictly positive
    pub fn new(instrument: &str, mut quotes: Vec<MarketQuote>) -> RiskResult<Self> {
        let raw_len = quotes.len();
        if !quotes.windows(2).all(|w| w[0].date < w[1].date) {
            tracing::warn!(instrument, "price series is not strictly ascending, re-ordering");
        }

        // stable sort keeps arrival order within a date, so the last one wins below
        quotes.sort_by_key(|q| q.date);
        let mut aligned: Vec<MarketQuote> = Vec::with_capacity(quotes.len());
        for quote in quotes.into_iter().filter(|q| q.price.is_finite()) {
            validate_positive("price", quote.price)?;
            match aligned.last_mut() {
                Some(last) if last.date == quote.date => *last = quote,
                _ => aligned.push(quote),
            }
        }

        if aligned.len() < raw_len {
            tracing::warn!(
                instrument,
                dropped = raw_len - aligned.len(),
                "dropped duplicate or missing observations"
            );
        }

        if aligned.is_empty() {
            return Err(RiskError::EmptySeries {
                instrument: instrument.to_string(),
            });
        }

        Ok(Self {
            instrument: instrument.to_string(),
            quotes: aligned,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn quotes(&self) -> &[MarketQuote] {
        &self.quotes
    }

    pub fn prices(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.price).collect()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.quotes[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.quotes[self.quotes.len() - 1].date
    }
}

/// A provider of historical closing prices.
pub trait PriceSource {
    /// Closing prices for `instrument` within `[start, end]`.
    ///
    /// Fails with `DataUnavailable` when the instrument is unknown or the range
    /// has no observations.
    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<Vec<MarketQuote>>;
}

/// Fixed quotes keyed by instrument.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<MarketQuote>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, instrument: &str, quotes: Vec<MarketQuote>) -> Self {
        self.series.insert(instrument.to_string(), quotes);
        self
    }
}

impl PriceSource for InMemoryPriceSource {
    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<Vec<MarketQuote>> {
        let quotes = self
            .series
            .get(instrument)
            .ok_or_else(|| RiskError::data_unavailable(instrument, "unknown instrument"))?;
        let in_range: Vec<MarketQuote> = quotes
            .iter()
            .filter(|q| q.date >= start && q.date <= end)
            .copied()
            .collect();
        if in_range.is_empty() {
            return Err(RiskError::data_unavailable(
                instrument,
                format!("no observations between {} and {}", start, end),
            ));
        }
        Ok(in_range)
    }
}

/// File-name stem for an instrument: `PETR4.SA` -> `PETR4`.
pub fn instrument_stem(instrument: &str) -> &str {
    EXCHANGE_SUFFIXES
        .iter()
        .find_map(|suffix| instrument.strip_suffix(suffix))
        .unwrap_or(instrument)
}
