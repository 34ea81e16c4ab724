//! Error types for the split_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for split_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed target month (expected YYYY-MM)
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    /// Workout plan validation error
    #[error("Plan validation error: {0}")]
    PlanValidation(String),

    /// Progression state error
    #[error("State error: {0}")]
    State(String),

    /// Schedule generation error
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
