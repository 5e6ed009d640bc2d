//! Error types for Voronoi diagram construction

use thiserror::Error;

/// Errors that can occur while configuring or building a diagram
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Sites or bounds handed to the builder are unusable
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Site generation could not satisfy its constraints
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
