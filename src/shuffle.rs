// SPDX-License-Identifier: MPL-2.0

//! Centering of a spectrum by swapping its quadrants.

use crate::grid::FrequencyGrid;
use crate::slice::fftshift;

/// Swap the diagonally opposite quadrants of every channel.
///
/// Moves the zero frequency from the top left corner to the center
/// `(height / 2, width / 2)`, and back again when applied a second time.
pub fn quadrant_shuffle(spectrum: &FrequencyGrid) -> FrequencyGrid {
    let (width, height) = (spectrum.width(), spectrum.height());
    spectrum.map_channels(|channel| fftshift(width, height, channel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;

    fn numbered(width: usize, height: usize) -> FrequencyGrid {
        let channel = |offset: f64| {
            (0..width * height)
                .map(|n| Complex::new(n as f64 + offset, -(n as f64)))
                .collect::<Vec<_>>()
        };
        FrequencyGrid::new(width, height, [channel(0.0), channel(100.0), channel(200.0)]).unwrap()
    }

    #[test]
    fn zero_frequency_moves_to_the_center() {
        let spectrum = numbered(6, 4);
        let centered = quadrant_shuffle(&spectrum);
        for c in 0..3 {
            assert_eq!(centered.coefficient(c, 2, 3), spectrum.coefficient(c, 0, 0));
            // top right <-> bottom left
            assert_eq!(centered.coefficient(c, 3, 0), spectrum.coefficient(c, 1, 3));
            assert_eq!(centered.coefficient(c, 0, 5), spectrum.coefficient(c, 2, 2));
        }
    }

    #[test]
    fn shuffling_twice_is_the_identity() {
        for (width, height) in [(2, 2), (4, 2), (6, 4), (8, 10)] {
            let spectrum = numbered(width, height);
            assert_eq!(quadrant_shuffle(&quadrant_shuffle(&spectrum)), spectrum);
        }
    }
}
