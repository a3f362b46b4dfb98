//! Error types for jpegsim

use thiserror::Error;

/// Result type alias for jpegsim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jpegsim
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (invalid quality, block sizes, thresholds)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dimensions of a frame or motion mask differ from the configured clip
    #[error("Shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a shape mismatch error from expected and actual dimensions
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Error::ShapeMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            width: actual.0,
            height: actual.1,
        }
    }
}
