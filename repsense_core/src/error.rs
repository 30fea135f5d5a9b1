//! Error types for the repsense_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for repsense_core operations
///
/// Geometry and evaluator code never produces these; missing landmarks and
/// degenerate vectors resolve to default values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error, including unknown exercise selectors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A detection call failed or the pose source is unavailable
    #[error("Pose source error: {0}")]
    PoseSource(String),
}
