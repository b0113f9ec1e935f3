pub mod bs_analytic;
pub mod greeks;

pub use bs_analytic::ValuationInputs;
pub use greeks::Greeks;
