// SPDX-License-Identifier: MPL-2.0

//! Ideal low-pass and high-pass filters on centered spectra.

use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::FrequencyGrid;

/// Which side of the cutoff circle is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Keep frequencies inside the circle.
    #[default]
    LowPass,
    /// Keep frequencies outside the circle.
    HighPass,
}

impl FilterMode {
    /// Whether a cell at squared distance `dist_sqr` from the center survives
    /// a cutoff of squared radius `radius_sqr`. The circle itself always does.
    pub fn passes(self, dist_sqr: f64, radius_sqr: f64) -> bool {
        match self {
            FilterMode::LowPass => dist_sqr <= radius_sqr,
            FilterMode::HighPass => dist_sqr >= radius_sqr,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterMode::LowPass => "low-pass",
            FilterMode::HighPass => "high-pass",
        })
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "lowpass" | "low" => Ok(FilterMode::LowPass),
            "highpass" | "high" => Ok(FilterMode::HighPass),
            _ => Err(format!("unknown filter mode '{s}', expected low-pass or high-pass")),
        }
    }
}

/// Binary mask keeping the cells on one side of a circle centered on
/// `(height / 2, width / 2)`.
///
/// Meant for spectra centered with [`quadrant_shuffle`](crate::shuffle::quadrant_shuffle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealFilter {
    radius: f64,
    mode: FilterMode,
}

impl IdealFilter {
    /// Filter with cutoff `radius`, in frequency cells.
    ///
    /// Fails with [`Error::InvalidCutoff`] if the radius is negative or not finite.
    pub fn new(radius: f64, mode: FilterMode) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidCutoff(radius));
        }
        Ok(Self { radius, mode })
    }

    /// Ideal low-pass filter.
    pub fn low_pass(radius: f64) -> Result<Self> {
        Self::new(radius, FilterMode::LowPass)
    }

    /// Ideal high-pass filter.
    pub fn high_pass(radius: f64) -> Result<Self> {
        Self::new(radius, FilterMode::HighPass)
    }

    /// Cutoff radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Kept side of the circle.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Row major mask, `true` where a cell is kept.
    pub fn mask(&self, width: usize, height: usize) -> Vec<bool> {
        let radius_sqr = self.radius * self.radius;
        let (origin_row, origin_col) = ((height / 2) as i64, (width / 2) as i64);
        (0..height as i64)
            .flat_map(|i| (0..width as i64).map(move |j| (i, j)))
            .map(|(i, j)| {
                let dist_sqr = (i - origin_row).pow(2) + (j - origin_col).pow(2);
                self.mode.passes(dist_sqr as f64, radius_sqr)
            })
            .collect()
    }

    /// Zero every coefficient of every channel outside the kept region.
    pub fn apply(&self, spectrum: &FrequencyGrid) -> FrequencyGrid {
        let mask = self.mask(spectrum.width(), spectrum.height());
        spectrum.map_channels(|channel| {
            channel
                .iter()
                .zip(&mask)
                .map(|(&coef, &keep)| if keep { coef } else { Complex::default() })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(width: usize, height: usize) -> FrequencyGrid {
        let channel = |seed: f64| {
            (0..width * height)
                .map(|n| Complex::new(seed + n as f64, seed - 2.0 * n as f64))
                .collect::<Vec<_>>()
        };
        FrequencyGrid::new(width, height, [channel(1.0), channel(50.0), channel(-7.0)]).unwrap()
    }

    #[test]
    #[rustfmt::skip]
    fn low_pass_mask_includes_the_circle() {
        let mask: Vec<u8> = IdealFilter::low_pass(1.0).unwrap()
            .mask(4, 4).into_iter().map(u8::from).collect();
        assert_eq!(mask, [
            0, 0, 0, 0,
            0, 0, 1, 0,
            0, 1, 1, 1,
            0, 0, 1, 0,
        ]);
    }

    #[test]
    fn zero_radius_low_pass_keeps_only_the_center() {
        let spectrum = spectrum(6, 4);
        let filtered = IdealFilter::low_pass(0.0).unwrap().apply(&spectrum);
        for c in 0..3 {
            for (n, coef) in filtered.channel(c).iter().enumerate() {
                if n == 2 * 6 + 3 {
                    assert_eq!(*coef, spectrum.channel(c)[n]);
                } else {
                    assert_eq!(*coef, Complex::default());
                }
            }
        }
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let spectrum = spectrum(8, 6);
        for filter in [
            IdealFilter::low_pass(2.5).unwrap(),
            IdealFilter::high_pass(2.5).unwrap(),
        ] {
            let once = filter.apply(&spectrum);
            assert_eq!(filter.apply(&once), once);
        }
    }

    #[test]
    fn low_and_high_pass_are_complementary() {
        let spectrum = spectrum(8, 8);
        for radius in [0.0, 1.0, 2.0, 2.5, 5.0, 100.0] {
            let low = IdealFilter::low_pass(radius).unwrap();
            let high = IdealFilter::high_pass(radius).unwrap();
            let (low_mask, high_mask) = (low.mask(8, 8), high.mask(8, 8));
            let (low_out, high_out) = (low.apply(&spectrum), high.apply(&spectrum));
            for n in 0..64 {
                let (i, j) = ((n / 8) as f64 - 4.0, (n % 8) as f64 - 4.0);
                let on_ring = i * i + j * j == radius * radius;
                assert!(low_mask[n] || high_mask[n], "cell {n} dropped by both");
                assert_eq!(low_mask[n] && high_mask[n], on_ring, "cell {n}");
                for c in 0..3 {
                    let kept = if low_mask[n] { low_out.channel(c)[n] } else { high_out.channel(c)[n] };
                    assert_eq!(kept, spectrum.channel(c)[n]);
                }
            }
        }
    }

    #[test]
    fn invalid_radius_is_rejected() {
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                IdealFilter::low_pass(radius),
                Err(Error::InvalidCutoff(_))
            ));
        }
    }

    #[test]
    fn mode_parses_from_cli_names() {
        assert_eq!("low-pass".parse::<FilterMode>(), Ok(FilterMode::LowPass));
        assert_eq!("HighPass".parse::<FilterMode>(), Ok(FilterMode::HighPass));
        assert_eq!("high_pass".parse::<FilterMode>(), Ok(FilterMode::HighPass));
        assert!("band-pass".parse::<FilterMode>().is_err());
    }
}
