// SPDX-License-Identifier: MPL-2.0

//! Fourier transform of RGB images, magnitude spectrum visualization
//! and ideal frequency-domain filtering.
//!
//! A run goes through these stages, each one a function from the previous
//! stage's output to a fresh value:
//!
//! 1. [`TransformEngine::forward`] turns a [`PixelGrid`] into a [`FrequencyGrid`],
//!    dropping a trailing odd row and/or column.
//! 2. [`quadrant_shuffle`] brings the zero frequency to the center.
//! 3. [`IdealFilter::apply`] keeps the inside (low-pass) or the outside
//!    (high-pass) of a circle around that center.
//! 4. [`quadrant_shuffle`] again puts the zero frequency back in the corner.
//! 5. [`TransformEngine::inverse`] goes back to a [`PixelGrid`].
//!
//! [`SpectrumVisualizer`] renders any spectrum along the way, and
//! [`Pipeline`] chains everything together.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod io;
pub mod pipeline;
pub mod shuffle;
pub mod slice;
pub mod spectrum;
pub mod transform;

pub use error::{Error, Result};
pub use filter::{FilterMode, IdealFilter};
pub use grid::{FrequencyGrid, PixelGrid};
pub use pipeline::{Pipeline, PipelineError};
pub use shuffle::quadrant_shuffle;
pub use spectrum::SpectrumVisualizer;
pub use transform::TransformEngine;
