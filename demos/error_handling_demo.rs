// demos/error_handling_demo.rs
use bs_risk::analytics::bs_analytic::bs_call_price;
use bs_risk::market::InMemoryPriceSource;
use bs_risk::output::CsvSink;
use bs_risk::volatility::annualized_volatility;
use bs_risk::{simulate, MarketQuote, OptionSimulator, RiskError, RunConfig, SimulationConfig};
use chrono::{Duration, NaiveDate};

fn quotes(prices: &[f64]) -> Vec<MarketQuote> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).expect("Valid date");
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| MarketQuote::new(start + Duration::days(i as i64), p))
        .collect()
}

fn main() {
    println!("Error Handling Demo for bs-risk");
    println!("===============================\n");

    // Test 1: Kernel precondition
    println!("1. Pricing with zero volatility...");
    match bs_call_price(100.0, 100.0, 1.0, 0.05, 0.0) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Degenerate volatility
    println!("\n2. Estimating volatility of a constant series...");
    match annualized_volatility(&[100.0, 100.0, 100.0]) {
        Ok(sigma) => println!("   Unexpected: σ = {}", sigma),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Empty series
    println!("\n3. Simulating an empty series...");
    match simulate("EMPTY", Vec::new(), &SimulationConfig::default()) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 4: Non-positive tenor is not an error
    println!("\n4. Simulating with tenor_days = 0...");
    let zero_tenor = SimulationConfig {
        tenor_days: 0,
        ..Default::default()
    };
    match simulate("ZERO", quotes(&[10.0, 10.4, 10.1]), &zero_tenor) {
        Ok(table) => println!("   ✓ Every day skipped, {} rows", table.len()),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 5: Markup driving the strike to zero
    println!("\n5. Simulating with strike_markup = -100%...");
    let bad_markup = SimulationConfig {
        strike_markup: -1.0,
        ..Default::default()
    };
    match simulate("BAD", quotes(&[10.0, 10.4, 10.1]), &bad_markup) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(RiskError::InvalidInput {
            parameter,
            value,
            constraint,
        }) => {
            println!("   ✓ Caught InvalidInput: {} = {} ({})", parameter, value, constraint);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 6: Unknown instrument at the source boundary
    println!("\n6. Running against an unknown instrument...");
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("Valid date");
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).expect("Valid date");
    let simulator =
        OptionSimulator::new(RunConfig::new("NOPE", start, end)).expect("Valid configuration");
    match simulator.run(&InMemoryPriceSource::new(), &CsvSink) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e @ RiskError::DataUnavailable { .. }) => println!("   ✓ Caught error: {}", e),
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 7: Invalid configuration
    println!("\n7. Negative risk-free rate...");
    let mut config = RunConfig::new("X", start, end);
    config.simulation.risk_free_rate = -0.02;
    match OptionSimulator::new(config) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    println!("\n✓ Error handling demo complete!");
}
