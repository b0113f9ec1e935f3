//! Closing prices stored as `<dir>/<stem>_raw_data.csv`.
//!
//! The file needs a header with at least `Date` (YYYY-MM-DD) and `Close`
//! columns; other columns are ignored and an empty `Close` counts as missing.

use super::{instrument_stem, MarketQuote, PriceSource};
use crate::error::{RiskError, RiskResult};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir
            .join(format!("{}_raw_data.csv", instrument_stem(instrument)))
    }

    /// Write quotes in the layout this source reads back.
    pub fn store(&self, instrument: &str, quotes: &[MarketQuote]) -> RiskResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(instrument);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Date", "Close"])?;
        for quote in quotes {
            writer.write_record([quote.date.to_string(), quote.price.to_string()])?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Fetch `[start, end]` from `upstream` and store it here, so later runs
    /// can replay the same prices from disk.
    pub fn download<S: PriceSource + ?Sized>(
        &self,
        upstream: &S,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<PathBuf> {
        let quotes = upstream.fetch(instrument, start, end)?;
        let path = self.store(instrument, &quotes)?;
        tracing::info!(instrument, rows = quotes.len(), path = %path.display(), "raw prices stored");
        Ok(path)
    }
}

fn read_quotes(path: &Path) -> RiskResult<Vec<MarketQuote>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut quotes = Vec::new();
    for row in reader.deserialize() {
        let row: RawRow = row?;
        quotes.push(MarketQuote::new(row.date, row.close.unwrap_or(f64::NAN)));
    }
    Ok(quotes)
}

impl PriceSource for CsvPriceSource {
    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<Vec<MarketQuote>> {
        let path = self.path_for(instrument);
        if !path.exists() {
            return Err(RiskError::data_unavailable(
                instrument,
                format!("{} does not exist", path.display()),
            ));
        }

        let quotes: Vec<MarketQuote> = read_quotes(&path)
            .map_err(|e| RiskError::data_unavailable(instrument, e.to_string()))?
            .into_iter()
            .filter(|q| q.date >= start && q.date <= end)
            .collect();

        if quotes.is_empty() {
            return Err(RiskError::data_unavailable(
                instrument,
                format!("no observations between {} and {}", start, end),
            ));
        }

        tracing::debug!(instrument, rows = quotes.len(), path = %path.display(), "loaded prices");
        Ok(quotes)
    }
}
