// SPDX-License-Identifier: MPL-2.0

//! Logarithmic rendering of a magnitude spectrum, for visual inspection.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{FrequencyGrid, PixelGrid};

/// What to do with a channel whose magnitude is zero everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegenerateChannel {
    /// Render the channel as all zeros.
    #[default]
    Blank,
    /// Fail with [`Error::DegenerateSpectrum`].
    Reject,
}

/// Renders each channel as `c * ln(1 + |coef|)`, with
/// `c = 255 / ln(1 + max |coef|)` computed per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpectrumVisualizer {
    /// Policy for all-zero channels.
    pub degenerate: DegenerateChannel,
}

impl SpectrumVisualizer {
    /// Visualizer applying `degenerate` to all-zero channels.
    pub fn new(degenerate: DegenerateChannel) -> Self {
        Self { degenerate }
    }

    /// Render the magnitude of `spectrum` as an image of the same size.
    ///
    /// The brightest cell of a channel is its largest magnitude.
    pub fn render(&self, spectrum: &FrequencyGrid) -> Result<PixelGrid> {
        let mut planes: [Vec<u8>; 3] = Default::default();
        for (channel, plane) in planes.iter_mut().enumerate() {
            *plane = self.render_channel(channel, spectrum)?;
        }
        PixelGrid::from_planes(spectrum.width(), spectrum.height(), planes)
    }

    fn render_channel(&self, channel: usize, spectrum: &FrequencyGrid) -> Result<Vec<u8>> {
        let magnitudes: Vec<f64> = spectrum.channel(channel).iter().map(|c| c.norm()).collect();
        let max_magnitude = magnitudes.iter().cloned().fold(0.0, f64::max);
        if max_magnitude <= 0.0 {
            return match self.degenerate {
                DegenerateChannel::Blank => {
                    debug!("channel {channel} has no energy, rendering it black");
                    Ok(vec![0; magnitudes.len()])
                }
                DegenerateChannel::Reject => Err(Error::DegenerateSpectrum { channel }),
            };
        }
        let scale = 255.0 / max_magnitude.ln_1p();
        Ok(magnitudes
            .into_iter()
            .map(|m| (scale * m.ln_1p()).clamp(0.0, 255.0) as u8)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;

    fn spectrum_with(channels: [Vec<Complex<f64>>; 3]) -> FrequencyGrid {
        FrequencyGrid::new(2, 2, channels).unwrap()
    }

    #[test]
    fn brightest_cell_is_the_largest_magnitude() {
        let channel = vec![
            Complex::new(0.0, 0.0),
            Complex::new(3.0, 4.0),
            Complex::new(-1000.0, 0.0),
            Complex::new(0.5, 0.0),
        ];
        let spectrum = spectrum_with([channel.clone(), channel.clone(), channel]);
        let image = SpectrumVisualizer::default().render(&spectrum).unwrap();
        let values: Vec<u8> = image.channel(0).collect();
        assert_eq!(values[0], 0);
        assert!(values[2] >= 254);
        let expected = (255.0 * 6f64.ln() / 1001f64.ln()) as u8;
        assert_eq!(values[1], expected);
        assert!(values[3] < values[1]);
    }

    #[test]
    fn output_stays_in_range() {
        let channel: Vec<_> = (0..4)
            .map(|n| Complex::new(1e12 * n as f64, -3.5 * n as f64))
            .collect();
        let spectrum = spectrum_with([channel.clone(), channel.clone(), channel]);
        let image = SpectrumVisualizer::default().render(&spectrum).unwrap();
        let values: Vec<u8> = image.channel(2).collect();
        assert_eq!(values[0], 0);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values[3] >= 254);
    }

    #[test]
    fn zero_channel_is_black_or_rejected() {
        let zero = vec![Complex::default(); 4];
        let live = vec![Complex::new(2.0, 0.0); 4];
        let spectrum = spectrum_with([live, zero.clone(), zero]);

        let image = SpectrumVisualizer::default().render(&spectrum).unwrap();
        assert!(image.channel(1).all(|v| v == 0));
        assert!(image.channel(2).all(|v| v == 0));
        assert!(image.channel(0).all(|v| v >= 254));

        let rejected = SpectrumVisualizer::new(DegenerateChannel::Reject).render(&spectrum);
        assert!(matches!(rejected, Err(Error::DegenerateSpectrum { channel: 1 })));
    }
}
