// SPDX-License-Identifier: MPL-2.0

//! Conversion of pixel grids to the frequency domain and back.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{even_dimensions, FrequencyGrid, PixelGrid};
use crate::slice;

/// How the 2D discrete Fourier transform is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Direct summation, O(width² * height²). Reference results.
    #[default]
    Direct,
    /// Row transforms followed by column transforms with rustfft.
    Separable,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Direct => "direct",
            Algorithm::Separable => "separable",
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" | "naive" => Ok(Algorithm::Direct),
            "separable" | "fft" => Ok(Algorithm::Separable),
            other => Err(format!("unknown algorithm '{other}', expected direct or separable")),
        }
    }
}

/// Forward and inverse transforms between [`PixelGrid`] and [`FrequencyGrid`].
///
/// `workers` picks where the work runs: `Some(1)` on the calling thread,
/// `Some(n)` on a dedicated pool of `n` threads, `None` on the global
/// rayon pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformEngine {
    /// Evaluation strategy.
    pub algorithm: Algorithm,
    /// Number of worker threads.
    pub workers: Option<usize>,
}

impl TransformEngine {
    /// Single threaded direct summation.
    pub fn reference() -> Self {
        Self {
            algorithm: Algorithm::Direct,
            workers: Some(1),
        }
    }

    /// Transform an image to the frequency domain.
    ///
    /// A trailing odd row and/or column is dropped first, so the spectrum
    /// may be one row and/or one column smaller than the image.
    /// No normalization is applied. Fails with [`Error::InvalidDimension`]
    /// if nothing is left after that truncation.
    pub fn forward(&self, image: &PixelGrid) -> Result<FrequencyGrid> {
        let (width, height) = even_dimensions(image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension {
                width: image.width(),
                height: image.height(),
            });
        }
        if (width, height) != (image.width(), image.height()) {
            debug!(
                "truncating {}x{} image to {width}x{height}",
                image.width(),
                image.height()
            );
        }

        let spatial = [0, 1, 2].map(|c| {
            image
                .pixels()
                .chunks_exact(image.width())
                .take(height)
                .flat_map(|row| &row[..width])
                .map(|pix| Complex::new(pix[c] as f64, 0.0))
                .collect::<Vec<_>>()
        });
        let channels = self.run(|parallel| {
            spatial.map(|buffer| self.transform(width, height, buffer, false, parallel))
        })?;
        FrequencyGrid::new(width, height, channels)
    }

    /// Transform a spectrum back to the spatial domain.
    ///
    /// Each pixel is the real part of the inverse sum scaled by
    /// 1 / (width * height), narrowed with [`to_channel`]. The imaginary
    /// residue left by a spectrum that is not conjugate symmetric (after
    /// filtering for instance) is dropped.
    pub fn inverse(&self, spectrum: &FrequencyGrid) -> Result<PixelGrid> {
        let (width, height) = (spectrum.width(), spectrum.height());
        let norm = 1.0 / (width * height) as f64;
        let planes = self.run(|parallel| {
            spectrum.channels().clone().map(|buffer| {
                self.transform(width, height, buffer, true, parallel)
                    .into_iter()
                    .map(|c| to_channel(c.re * norm))
                    .collect::<Vec<u8>>()
            })
        })?;
        PixelGrid::from_planes(width, height, planes)
    }

    fn transform(
        &self,
        width: usize,
        height: usize,
        mut buffer: Vec<Complex<f64>>,
        inverse: bool,
        parallel: bool,
    ) -> Vec<Complex<f64>> {
        match (self.algorithm, inverse, parallel) {
            (Algorithm::Direct, false, false) => slice::dft_2d(width, height, &buffer),
            (Algorithm::Direct, false, true) => slice::par_dft_2d(width, height, &buffer),
            (Algorithm::Direct, true, false) => slice::idft_2d(width, height, &buffer),
            (Algorithm::Direct, true, true) => slice::par_idft_2d(width, height, &buffer),
            (Algorithm::Separable, false, false) => {
                slice::fft_2d(width, height, &mut buffer);
                buffer
            }
            (Algorithm::Separable, false, true) => {
                slice::par_fft_2d(width, height, &mut buffer);
                buffer
            }
            (Algorithm::Separable, true, false) => {
                slice::ifft_2d(width, height, &mut buffer);
                buffer
            }
            (Algorithm::Separable, true, true) => {
                slice::par_ifft_2d(width, height, &mut buffer);
                buffer
            }
        }
    }

    /// Run `job` where `workers` says, telling it whether to go parallel.
    fn run<T: Send>(&self, job: impl FnOnce(bool) -> T + Send) -> Result<T> {
        match self.workers {
            Some(1) => Ok(job(false)),
            Some(workers) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()?;
                Ok(pool.install(|| job(true)))
            }
            None => Ok(job(true)),
        }
    }
}

/// Narrow a reconstructed intensity to a channel value.
///
/// The value is clamped to [0, 255] then truncated toward zero,
/// NaN maps to 0.
pub fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, u8::MAX as f64) as u8
}
