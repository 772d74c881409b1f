//! Error types for scenario configuration and staff pools.

use thiserror::Error;

/// Invalid scenario configuration. Raised before the run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{pool} pool capacity must be positive")]
    NonPositiveCapacity { pool: &'static str },
    #[error("{what} mean must be non-negative, got {value}")]
    NegativeMean { what: &'static str, value: f64 },
    #[error("arrival interval with zero mean and zero spread never advances time")]
    DegenerateArrivalInterval,
    #[error("{what} standard deviation must be finite and non-negative, got {value}")]
    InvalidStdDev { what: &'static str, value: f64 },
    #[error("referral probability must be within [0, 1], got {0}")]
    ReferralProbabilityOutOfRange(f64),
    #[error("simulation horizon must be finite and non-negative, got {0}")]
    InvalidHorizon(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Misuse of a staff pool at run time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("release on {pool} pool with no unit in use")]
    InvalidRelease { pool: &'static str },
}
