//! Error types for the precip-map crates.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for projection and geometry operations.
#[derive(Debug, Error)]
pub enum MapError {
    // === Configuration errors ===
    #[error("Unrecognized projection: {0}")]
    UnrecognizedProjection(String),

    #[error("UTM zone out of range [1,60]: {0}")]
    InvalidZone(i32),

    #[error("Invalid projection descriptor: {0}")]
    InvalidDescriptor(String),

    // === Numerical errors ===
    #[error("Inverse projection failed to converge at ({x}, {y})")]
    ConvergenceFailure { x: f64, y: f64 },

    #[error("Point outside projection domain: {0}")]
    ProjectionDomain(String),

    // === Grid errors ===
    #[error("Invalid grid bounds: {0}")]
    InvalidGridBounds(String),
}
