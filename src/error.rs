//! Error types for rscope operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while measuring a resized calibration image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input file is missing or could not be opened.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The input file is not a raster image the codec understands.
    #[error("Image decode failed: {path}: {reason}")]
    Decode {
        /// Path to the image that failed to decode.
        path: PathBuf,
        /// Reason reported by the decoder.
        reason: String,
    },

    /// The decoded image does not have the shape the pattern requires.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// The calibration pattern could not be determined from image content.
    #[error("Detection of image type failed: {path}: {reason}")]
    Detection {
        /// Path to the image being classified.
        path: PathBuf,
        /// Why classification was impossible.
        reason: String,
    },

    /// Failed to write an output raster or vector image.
    #[error("Image encode failed: {path}: {reason}")]
    Encode {
        /// Output path.
        path: PathBuf,
        /// Reason reported by the encoder.
        reason: String,
    },

    /// A requested scale or fudge factor is not a finite positive number.
    #[error("Invalid scale factor: {0} (expected a finite value > 0)")]
    InvalidScaleFactor(f64),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Shape violations detected before analysis starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// Dot-pattern images must keep the source height exactly.
    #[error("Image is wrong height (is {actual}, should be {expected})")]
    WrongHeight {
        /// Required height.
        expected: usize,
        /// Observed height.
        actual: usize,
    },

    /// Dot-pattern images narrower than the minimum carry too few reference points.
    #[error("Image is wrong width (is {actual}, must be at least {minimum})")]
    TooNarrow {
        /// Minimum usable width.
        minimum: usize,
        /// Observed width.
        actual: usize,
    },

    /// Line-pattern images need three rows for the cyclic row sampling.
    #[error("Image height ({actual}) too small (must be at least {minimum})")]
    TooShort {
        /// Minimum usable height.
        minimum: usize,
        /// Observed height.
        actual: usize,
    },
}
