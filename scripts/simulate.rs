// scripts/simulate.rs
//! Command-line driver: price one instrument's history and export the risk table.
//!
//! ```text
//! simulate --instrument PETR4.SA --start 2023-01-01 --end 2023-12-31 --data-dir data/raw
//! ```

use bs_risk::logging::{init_logging, LogFormat};
use bs_risk::market::{CsvPriceSource, SyntheticPriceSource};
use bs_risk::output::CsvSink;
use bs_risk::{OptionSimulator, RunConfig, SimulationConfig};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Black-Scholes risk surface over a historical price series")]
#[command(version)]
struct Cli {
    /// Instrument identifier, e.g. PETR4.SA
    #[arg(short, long, env = "BS_RISK_INSTRUMENT")]
    instrument: String,

    /// First valuation date (YYYY-MM-DD)
    #[arg(long, env = "BS_RISK_START")]
    start: NaiveDate,

    /// Last valuation date (YYYY-MM-DD), defaults to today
    #[arg(long, env = "BS_RISK_END")]
    end: Option<NaiveDate>,

    /// Annualized risk-free rate
    #[arg(long, default_value_t = 0.08, env = "BS_RISK_RATE")]
    rate: f64,

    /// Strike markup over spot as a fraction
    #[arg(long, default_value_t = 0.05, env = "BS_RISK_MARKUP", allow_hyphen_values = true)]
    markup: f64,

    /// Calendar days to maturity
    #[arg(long, default_value_t = 90, env = "BS_RISK_TENOR_DAYS", allow_hyphen_values = true)]
    tenor_days: i32,

    /// Directory holding <stem>_raw_data.csv files
    #[arg(long, default_value = "data/raw", env = "BS_RISK_DATA_DIR")]
    data_dir: PathBuf,

    #[arg(long, default_value = "data/processed", env = "BS_RISK_PROCESSED_DIR")]
    processed_dir: PathBuf,

    #[arg(long, default_value = "data/exports", env = "BS_RISK_EXPORTS_DIR")]
    exports_dir: PathBuf,

    /// Evaluate days on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Generate seeded GBM prices into --data-dir before the run
    #[arg(long, value_name = "SEED", env = "BS_RISK_SYNTHETIC_SEED")]
    synthetic: Option<u64>,

    /// pretty, json or compact
    #[arg(long, default_value = "pretty", env = "BS_RISK_LOG_FORMAT")]
    log_format: LogFormat,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let end = self.end.unwrap_or_else(|| chrono::Local::now().date_naive());
        RunConfig {
            instrument: self.instrument.clone(),
            start: self.start,
            end,
            processed_dir: self.processed_dir.clone(),
            exports_dir: self.exports_dir.clone(),
            simulation: SimulationConfig {
                risk_free_rate: self.rate,
                strike_markup: self.markup,
                tenor_days: self.tenor_days,
                parallel: self.parallel,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    let simulator = OptionSimulator::new(cli.run_config())?;
    let source = CsvPriceSource::new(&cli.data_dir);
    if let Some(seed) = cli.synthetic {
        let generator = SyntheticPriceSource {
            seed,
            ..Default::default()
        };
        let cfg = simulator.config();
        source.download(&generator, &cfg.instrument, cfg.start, cfg.end)?;
    }

    let report = simulator.run(&source, &CsvSink)?;

    tracing::info!(
        rows = report.table.len(),
        observations = report.observations,
        sigma = report.sigma,
        first = %report.first_date,
        last = %report.last_date,
        "simulation finished"
    );
    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(())
}
