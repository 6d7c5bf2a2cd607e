// SPDX-License-Identifier: MPL-2.0

//! Pixel and frequency grids exchanged between the stages.
//!
//! Both grids are stored in row major order: the cell at `(row, col)`
//! lives at index `row * width + col`.

use rustfft::num_complex::Complex;

use crate::error::{Error, Result};

/// Number of color channels carried by every grid.
pub const CHANNELS: usize = 3;

/// One pixel, one byte per channel.
pub type Rgb = [u8; CHANNELS];

/// Largest even dimensions fitting in `width` x `height`.
///
/// A trailing odd column and/or row is dropped so that the four quadrants
/// of a frequency grid always have the same size.
pub fn even_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width & !1, height & !1)
}

/// A non-empty `width` x `height` grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    /// Wrap a row major pixel buffer.
    ///
    /// Fails with [`Error::InvalidDimension`] if either dimension is zero
    /// and with [`Error::LengthMismatch`] if the buffer does not hold
    /// exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        if pixels.len() != width * height {
            return Err(Error::LengthMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Rgb,
    ) -> Result<Self> {
        let pixels = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .map(|(row, col)| f(row, col))
            .collect();
        Self::new(width, height, pixels)
    }

    /// A grid where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Rgb) -> Result<Self> {
        Self::new(width, height, vec![pixel; width * height])
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row major pixel buffer.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(row, col)`.
    ///
    /// Panics if the coordinates are out of bounds, like slice indexing.
    pub fn pixel(&self, row: usize, col: usize) -> Rgb {
        assert!(col < self.width, "column {col} out of bounds");
        self.pixels[row * self.width + col]
    }

    /// Values of one channel in row major order.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = u8> + '_ {
        self.pixels.iter().map(move |pix| pix[channel])
    }

    /// Build a grid from three planes of equal length.
    pub(crate) fn from_planes(
        width: usize,
        height: usize,
        planes: [Vec<u8>; CHANNELS],
    ) -> Result<Self> {
        let [r, g, b] = planes;
        let pixels = r
            .into_iter()
            .zip(g)
            .zip(b)
            .map(|((r, g), b)| [r, g, b])
            .collect();
        Self::new(width, height, pixels)
    }
}

/// Per-channel complex coefficients of a `width` x `height` image.
///
/// Both dimensions are even and non-zero, the coefficient at frequency
/// `(k, l)` lives at index `k * width + l`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    width: usize,
    height: usize,
    channels: [Vec<Complex<f64>>; CHANNELS],
}

impl FrequencyGrid {
    /// Wrap three coefficient buffers.
    ///
    /// Fails with [`Error::InvalidDimension`] unless both dimensions are
    /// even and non-zero, and with [`Error::LengthMismatch`] unless every
    /// channel holds `width * height` coefficients.
    pub fn new(
        width: usize,
        height: usize,
        channels: [Vec<Complex<f64>>; CHANNELS],
    ) -> Result<Self> {
        if width == 0 || height == 0 || width % 2 == 1 || height % 2 == 1 {
            return Err(Error::InvalidDimension { width, height });
        }
        if let Some(bad) = channels.iter().find(|c| c.len() != width * height) {
            return Err(Error::LengthMismatch {
                expected: width * height,
                actual: bad.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// A grid of zero coefficients.
    pub fn zeros(width: usize, height: usize) -> Result<Self> {
        let zeros = vec![Complex::default(); width * height];
        Self::new(width, height, [zeros.clone(), zeros.clone(), zeros])
    }

    /// Number of frequency columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of frequency rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Coefficients of one channel.
    pub fn channel(&self, channel: usize) -> &[Complex<f64>] {
        &self.channels[channel]
    }

    /// All three channels.
    pub fn channels(&self) -> &[Vec<Complex<f64>>; CHANNELS] {
        &self.channels
    }

    /// Coefficient of `channel` at frequency `(k, l)`.
    pub fn coefficient(&self, channel: usize, k: usize, l: usize) -> Complex<f64> {
        assert!(l < self.width, "column {l} out of bounds");
        self.channels[channel][k * self.width + l]
    }

    /// New grid of the same shape, each channel produced by `f`.
    ///
    /// `f` must return as many coefficients as it was given.
    pub(crate) fn map_channels(
        &self,
        mut f: impl FnMut(&[Complex<f64>]) -> Vec<Complex<f64>>,
    ) -> Self {
        let channels = [0, 1, 2].map(|c| f(&self.channels[c]));
        debug_assert!(channels.iter().all(|c| c.len() == self.width * self.height));
        Self {
            width: self.width,
            height: self.height,
            channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_dimensions_drop_trailing_odd_row_and_column() {
        assert_eq!(even_dimensions(5, 3), (4, 2));
        assert_eq!(even_dimensions(4, 7), (4, 6));
        assert_eq!(even_dimensions(8, 8), (8, 8));
        assert_eq!(even_dimensions(1, 1), (0, 0));
    }

    #[test]
    fn pixel_grid_rejects_bad_shapes() {
        assert!(matches!(
            PixelGrid::new(0, 4, vec![]),
            Err(Error::InvalidDimension { width: 0, height: 4 })
        ));
        assert!(matches!(
            PixelGrid::new(2, 2, vec![[0; 3]; 3]),
            Err(Error::LengthMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn pixel_grid_is_row_major() {
        let grid = PixelGrid::from_fn(3, 2, |row, col| [row as u8, col as u8, 7]).unwrap();
        assert_eq!(grid.pixel(1, 2), [1, 2, 7]);
        assert_eq!(grid.pixels()[5], [1, 2, 7]);
        assert_eq!(grid.channel(1).collect::<Vec<_>>(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn frequency_grid_requires_even_dimensions() {
        assert!(matches!(
            FrequencyGrid::zeros(3, 2),
            Err(Error::InvalidDimension { width: 3, height: 2 })
        ));
        assert!(FrequencyGrid::zeros(4, 2).is_ok());

        let short = vec![Complex::default(); 3];
        let full = vec![Complex::default(); 4];
        assert!(matches!(
            FrequencyGrid::new(2, 2, [full.clone(), short, full]),
            Err(Error::LengthMismatch { expected: 4, actual: 3 })
        ));
    }
}
