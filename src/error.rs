//! Error types for dataset operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::LoaderError;

/// Errors surfaced by dataset construction and sample loading.
///
/// Nothing is retried. Each failure belongs to the call that produced it.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Directory traversal failed (missing or unreadable root)
    #[error("Failed to scan {root:?}: {source}")]
    Walk {
        /// Root passed to the resolver
        root: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// A sample file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A sample file was read but could not be decoded
    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        /// File that was being decoded
        path: PathBuf,
        /// Decoder error
        #[source]
        source: LoaderError,
    },

    /// Sample index past the end of the dataset
    #[error("Index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Dataset length
        len: usize,
    },

    /// Crop window does not fit inside the sample
    #[error("Crop size {crop_size} exceeds sample size {height}x{width}")]
    CropTooLarge {
        /// Configured crop size
        crop_size: usize,
        /// Sample height
        height: usize,
        /// Sample width
        width: usize,
    },

    /// Cube and image of a pair disagree spatially
    #[error("Cube is {}x{} but image is {}x{}", cube.0, cube.1, image.0, image.1)]
    ShapeMismatch {
        /// Cube `(height, width)`
        cube: (usize, usize),
        /// Image `(height, width)`
        image: (usize, usize),
    },

    /// Configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DatasetError {
    /// Returns true if this error means a file was absent on disk.
    pub fn is_not_found(&self) -> bool {
        match self {
            DatasetError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            DatasetError::Walk { source, .. } => source
                .io_error()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound),
            _ => false,
        }
    }
}

/// Result type alias for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;
