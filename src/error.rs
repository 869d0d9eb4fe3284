use std::io;

use thiserror::Error;

/// Errors produced while setting up or writing a frame.
///
/// Tracing itself cannot fail once a `World` and `Camera` exist; every error
/// here comes from building those inputs or from saving the result.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A ray was built with a zero-length direction.
    #[error("invalid argument: ray direction has zero length")]
    ZeroDirection,

    #[error("invalid shading mode {0}, expected 0 to 3")]
    InvalidShadingMode(i64),

    #[error("sphere {index} has non-positive radius {radius}")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("ground index {index} is out of range for {len} spheres")]
    InvalidGround { index: usize, len: usize },

    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TraceError>;
