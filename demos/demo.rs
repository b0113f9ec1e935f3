// demos/demo.rs
use bs_risk::analytics::greeks::theta_per_day;
use bs_risk::analytics::ValuationInputs;
use bs_risk::market::SyntheticPriceSource;
use bs_risk::math_utils::Timer;
use bs_risk::maturity::DAYS_PER_YEAR;
use bs_risk::output::CsvSink;
use bs_risk::{OptionSimulator, RunConfig};
use chrono::NaiveDate;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let out_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("bs-risk-demo"));

    run_pricing_demo();
    run_simulation_demo(out_dir);
}

fn run_pricing_demo() {
    println!("Running bs-risk Black-Scholes Demo\n");

    let s = 100.0;
    let k = 100.0;
    let t = 1.0;
    let r = 0.05;
    let sigma = 0.2;

    let inputs = ValuationInputs::new(s, k, t, r, sigma).expect("Valid inputs");
    let g = inputs.greeks();

    println!("--- European Option, S={} K={} T={} r={} σ={} ---", s, k, t, r, sigma);
    println!("d1:          {:.6}", inputs.d1());
    println!("d2:          {:.6}", inputs.d2());
    println!("Call price:  {:.4}", inputs.call_price());
    println!("Put price:   {:.4}", inputs.put_price());
    println!("Delta call:  {:.4}", g.delta_call);
    println!("Delta put:   {:.4}", g.delta_put);
    println!("Gamma:       {:.4}", g.gamma);
    println!("Vega:        {:.4}", g.vega);
    println!(
        "Theta call:  {:.4} per year ({:.4} per calendar day)",
        g.theta_call,
        theta_per_day(g.theta_call, DAYS_PER_YEAR).expect("Positive day count")
    );
    println!("Theta put:   {:.4} per year", g.theta_put);
    println!("Rho call:    {:.4}", g.rho_call);
    println!("Rho put:     {:.4}", g.rho_put);

    let parity = inputs.call_price() - inputs.put_price() - (s - k * inputs.discount_factor());
    println!("Put-call parity residual: {:.3e}\n", parity);
}

fn run_simulation_demo(out_dir: PathBuf) {
    println!("--- Historical Risk Surface (synthetic prices) ---");

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("Valid date");
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).expect("Valid date");
    let mut config = RunConfig::new("DEMO.SA", start, end);
    config.processed_dir = out_dir.join("processed");
    config.exports_dir = out_dir.join("exports");

    let source = SyntheticPriceSource::default();
    let simulator = OptionSimulator::new(config).expect("Valid configuration");

    let mut timer = Timer::new();
    timer.start();
    let report = simulator.run(&source, &CsvSink).expect("Simulation should succeed");
    let elapsed = timer.elapsed_ms();

    println!("Observations:        {}", report.observations);
    println!("Rows:                {}", report.table.len());
    println!("Annualized σ:        {:.4}", report.sigma);
    println!("Elapsed:             {:.3} ms", elapsed);

    println!("\n{:<12} {:>9} {:>9} {:>9} {:>9} {:>8}", "Date", "Spot", "Strike", "Call", "Put", "Delta");
    for record in report.table.iter().take(5) {
        println!(
            "{:<12} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>8.4}",
            record.date.to_string(),
            record.stock_price,
            record.strike_price,
            record.call_price,
            record.put_price,
            record.delta_call
        );
    }

    for path in &report.written {
        println!("Written: {}", path.display());
    }
}
