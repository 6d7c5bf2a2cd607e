// SPDX-License-Identifier: MPL-2.0

//! Error types shared by every stage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the transform, filtering and I/O stages.
#[derive(Error, Debug)]
pub enum Error {
    /// A grid was built with a zero dimension, or an image shrank to nothing
    /// once truncated to even dimensions.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimension {
        /// Offending width.
        width: usize,
        /// Offending height.
        height: usize,
    },

    /// A buffer length does not match the grid it is supposed to fill.
    #[error("expected {expected} cells, got {actual}")]
    LengthMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },

    /// A spectrum channel has zero magnitude everywhere and the visualizer
    /// was asked to reject such channels.
    #[error("channel {channel} has an all-zero magnitude spectrum")]
    DegenerateSpectrum {
        /// Index of the channel (0, 1 or 2).
        channel: usize,
    },

    /// The cutoff radius of an ideal filter is negative, NaN or infinite.
    #[error("cutoff radius must be finite and non-negative, got {0}")]
    InvalidCutoff(f64),

    /// Reading or writing an image failed.
    #[error("image I/O on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying codec or filesystem error.
        #[source]
        source: image::ImageError,
    },

    /// A configuration file could not be read.
    #[error("reading config {}: {source}", path.display())]
    ConfigRead {
        /// Configuration file.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`PipelineConfig`](crate::config::PipelineConfig).
    #[error("parsing config {}: {source}", path.display())]
    ConfigParse {
        /// Configuration file.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The fixed-size worker pool could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
