// src/error.rs
use thiserror::Error;

/// Error types for the bs-risk library
#[derive(Error, Debug)]
pub enum RiskError {
    /// A kernel precondition was violated (S, K, T, σ must be strictly positive and finite)
    #[error("Invalid input '{parameter}' = {value}: {constraint}")]
    InvalidInput {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Volatility cannot be estimated from the supplied prices
    #[error("Insufficient data to estimate volatility ({observations} usable prices): {reason}")]
    InsufficientData { observations: usize, reason: String },

    /// No observations to process
    #[error("Price series for '{instrument}' is empty")]
    EmptySeries { instrument: String },

    /// The price-series source could not deliver data
    #[error("Data unavailable for '{instrument}': {reason}")]
    DataUnavailable { instrument: String, reason: String },

    /// Invalid run configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The run was cancelled between two observations
    #[error("Simulation cancelled after {processed} observations")]
    Cancelled { processed: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for bs-risk operations
pub type RiskResult<T> = Result<T, RiskError>;

impl RiskError {
    pub fn invalid_input(parameter: &str, value: f64, constraint: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter: parameter.to_string(),
            value,
            constraint: constraint.into(),
        }
    }

    pub fn data_unavailable(instrument: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            instrument: instrument.to_string(),
            reason: reason.into(),
        }
    }
}

/// Validation utilities
pub mod validation {
    use super::{RiskError, RiskResult};

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> RiskResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(RiskError::invalid_input(name, value, "must be positive (> 0)"))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> RiskResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(RiskError::invalid_input(
                name,
                value,
                "must be non-negative (≥ 0)",
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> RiskResult<()> {
        if !value.is_finite() {
            Err(RiskError::invalid_input(
                name,
                value,
                "must be finite (not NaN or infinite)",
            ))
        } else {
            Ok(())
        }
    }
}
