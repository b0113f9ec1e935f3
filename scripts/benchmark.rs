// scripts/benchmark.rs
use bs_risk::analytics::ValuationInputs;
use bs_risk::market::{PriceSeries, PriceSource, SyntheticPriceSource};
use bs_risk::math_utils::Timer;
use bs_risk::simulation::simulate_series;
use bs_risk::SimulationConfig;
use chrono::{Duration, NaiveDate};
use std::env;
use std::fs::File;
use std::io::Write;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    rows: usize,
    time_ms: f64,
    throughput_rows_per_sec: f64,
}

fn synthetic_series(years: i64) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).expect("Valid date");
    let end = start + Duration::days(365 * years);
    let quotes = SyntheticPriceSource::default()
        .fetch("BENCH", start, end)
        .expect("Synthetic source covers every range with weekdays");
    PriceSeries::new("BENCH", quotes).expect("Synthetic prices are positive")
}

fn run_kernel_benchmark() -> BenchmarkResult {
    let evaluations = 1_000_000;
    let mut timer = Timer::new();
    timer.start();
    let mut checksum = 0.0;
    for i in 0..evaluations {
        let spot = 80.0 + (i % 400) as f64 * 0.1;
        let inputs = ValuationInputs::new(spot, 100.0, 0.25, 0.08, 0.3).expect("Valid inputs");
        let g = inputs.greeks();
        checksum += inputs.call_price() + inputs.put_price() + g.delta_call;
    }
    let time_ms = timer.elapsed_ms();
    println!("  kernel checksum: {:.6}", checksum);

    BenchmarkResult {
        name: "Prices + Greeks".to_string(),
        rows: evaluations,
        time_ms,
        throughput_rows_per_sec: evaluations as f64 / (time_ms / 1000.0),
    }
}

fn run_simulation_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &years in &[1_i64, 10, 100] {
        let series = synthetic_series(years);
        println!("Running simulation benchmarks with {} observations...", series.len());

        for parallel in [false, true] {
            let cfg = SimulationConfig {
                parallel,
                ..Default::default()
            };
            let mut timer = Timer::new();
            timer.start();
            let table = simulate_series(&series, &cfg).expect("Valid simulation");
            let time_ms = timer.elapsed_ms();

            results.push(BenchmarkResult {
                name: format!(
                    "Simulation {} ({}y)",
                    if parallel { "parallel" } else { "sequential" },
                    years
                ),
                rows: table.len(),
                time_ms,
                throughput_rows_per_sec: table.len() as f64 / (time_ms / 1000.0),
            });
        }
    }

    results
}

fn write_results(path: &str, info: &SystemInfo, results: &[BenchmarkResult]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(
        file,
        "# os={} cores={} rayon_threads={} rustflags={}",
        info.os, info.cpu_cores, info.rayon_threads, info.rustc_flags
    )?;
    writeln!(file, "name,rows,time_ms,rows_per_sec")?;
    for r in results {
        writeln!(file, "{},{},{:.3},{:.1}", r.name, r.rows, r.time_ms, r.throughput_rows_per_sec)?;
    }
    Ok(())
}

fn main() {
    let info = SystemInfo::gather();
    println!("bs-risk benchmark");
    println!("{:?}\n", info);

    let mut results = vec![run_kernel_benchmark()];
    results.extend(run_simulation_benchmarks());

    println!("\n{:<32} {:>10} {:>12} {:>14}", "Benchmark", "Rows", "Time (ms)", "Rows/sec");
    for r in &results {
        println!(
            "{:<32} {:>10} {:>12.3} {:>14.0}",
            r.name, r.rows, r.time_ms, r.throughput_rows_per_sec
        );
    }

    if let Some(path) = env::args().nth(1) {
        match write_results(&path, &info, &results) {
            Ok(()) => println!("\nResults written to {}", path),
            Err(e) => eprintln!("\nCould not write {}: {}", path, e),
        }
    }
}
