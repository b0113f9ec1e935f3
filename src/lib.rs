//! # bs-risk: Black-Scholes Risk Surfaces from Historical Prices
//!
//! Closed-form Black-Scholes prices and Greeks for European options, and a
//! driver that replays a historical closing-price series to produce one
//! valuation row per trading day.
//!
//! ## Key Features
//!
//! - **Pricing kernel**: d₁, d₂, call and put prices with validated inputs
//! - **Greeks**: Delta, Gamma, Vega, Theta and Rho for calls and puts
//! - **Historical volatility**: sample stdev of simple returns, annualized by √252
//! - **Simulation**: one synthetic contract per day (strike = spot + markup,
//!   fixed calendar tenor), optionally evaluated in parallel with Rayon
//! - **Export**: CSV tables with full floating-point precision
//!
//! ## Quick Start
//!
//! ```rust
//! use bs_risk::analytics::{bs_analytic, ValuationInputs};
//!
//! let call = bs_analytic::bs_call_price(100.0, 100.0, 1.0, 0.05, 0.20).expect("valid inputs");
//! assert!((call - 10.4506).abs() < 1e-3);
//!
//! let inputs = ValuationInputs::new(100.0, 100.0, 1.0, 0.05, 0.20).expect("valid inputs");
//! let greeks = inputs.greeks();
//! assert!((greeks.delta_call - greeks.delta_put - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Conventions
//!
//! Volatility is annualized with 252 trading days; time to maturity uses a
//! 365-day calendar year. Theta and Rho are per year, Vega per unit of σ.

pub mod analytics;
pub mod error;
pub mod logging;
pub mod market;
pub mod math_utils;
pub mod maturity;
pub mod output;
pub mod runner;
pub mod simulation;
pub mod volatility;

// Re-export commonly used types for convenience
pub use analytics::{Greeks, ValuationInputs};
pub use error::{RiskError, RiskResult};
pub use market::{MarketQuote, PriceSeries, PriceSource};
pub use runner::{OptionSimulator, RunConfig, RunReport};
pub use simulation::{simulate, RiskRecord, RiskTable, RunContext, SimulationConfig};
