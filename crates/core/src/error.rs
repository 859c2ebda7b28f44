//! Error types for chordmorph

use thiserror::Error;

/// Main error type for chordmorph operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Sample buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {name} = {value} ({reason})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidArgument {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error rejects the caller's input before any work was done.
    ///
    /// Dimension, buffer-size and argument errors all fall in this category.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimensions { .. } | Error::SizeMismatch { .. } | Error::InvalidArgument { .. }
        )
    }
}

/// Result type alias for chordmorph operations
pub type Result<T> = std::result::Result<T, Error>;
