// src/output.rs
//! Tabular export of risk tables.
//!
//! One CSV row per [`RiskRecord`], one column per field, header included.
//! Floats are written in their shortest round-trip form, so reading a file
//! back yields bit-identical values.

use crate::error::{RiskError, RiskResult};
use crate::simulation::{RiskRecord, RiskTable};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for completed risk tables.
pub trait RiskSink {
    /// Persist `table` at `destination`, creating missing parent directories.
    fn write(&self, table: &RiskTable, destination: &Path) -> RiskResult<()>;

    /// Remove a table this sink wrote earlier. Missing destinations are not an error.
    fn discard(&self, destination: &Path) -> RiskResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl RiskSink for CsvSink {
    fn write(&self, table: &RiskTable, destination: &Path) -> RiskResult<()> {
        write_risk_table(destination, table)
    }

    fn discard(&self, destination: &Path) -> RiskResult<()> {
        match fs::remove_file(destination) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Sibling file a table is written to before being renamed into place.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `table` as CSV at `path`.
///
/// Rows go to a `.partial` sibling that is renamed over `path` once complete,
/// so `path` never holds a truncated table.
pub fn write_risk_table(path: &Path, table: &RiskTable) -> RiskResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let staged = write_csv(&staging, table)
        .and_then(|()| fs::rename(&staging, path).map_err(RiskError::from));
    if let Err(e) = staged {
        if let Err(cleanup) = fs::remove_file(&staging) {
            tracing::debug!(path = %staging.display(), error = %cleanup, "no staging file to remove");
        }
        return Err(e);
    }

    tracing::info!(path = %path.display(), rows = table.len(), "risk table written");
    Ok(())
}

fn write_csv(path: &Path, table: &RiskTable) -> RiskResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if table.is_empty() {
        // serde only emits the header alongside the first row
        writer.write_record(COLUMNS)?;
    }
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_risk_table(path: &Path) -> RiskResult<RiskTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<RiskRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RiskTable::from_records(records))
}

/// Column order of an exported table
pub const COLUMNS: [&str; 16] = [
    "Date",
    "Stock_Price",
    "Strike_Price",
    "Time_to_Maturity_Years",
    "Risk_Free_Rate",
    "Volatility",
    "Call_Price",
    "Put_Price",
    "Delta_Call",
    "Delta_Put",
    "Gamma",
    "Vega",
    "Theta_Call",
    "Theta_Put",
    "Rho_Call",
    "Rho_Put",
];
