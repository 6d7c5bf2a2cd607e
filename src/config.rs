// SPDX-License-Identifier: MPL-2.0

//! Run parameters, loadable from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::{FilterMode, IdealFilter};
use crate::pipeline::{Artifact, Pipeline};
use crate::spectrum::{DegenerateChannel, SpectrumVisualizer};
use crate::transform::TransformEngine;

/// Where each intermediate picture goes. Unset artifacts are not written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    /// Input image, after decoding.
    pub original: Option<PathBuf>,
    /// Spectrum straight out of the forward transform.
    pub raw_spectrum: Option<PathBuf>,
    /// Spectrum with the zero frequency at the center.
    pub centered_spectrum: Option<PathBuf>,
    /// Centered spectrum after filtering.
    pub filtered_spectrum: Option<PathBuf>,
    /// Filtered spectrum shuffled back, as fed to the inverse transform.
    pub restored_spectrum: Option<PathBuf>,
    /// Filtered image.
    pub reconstructed: Option<PathBuf>,
}

impl OutputPaths {
    /// Destination of `artifact`, if any.
    pub fn path(&self, artifact: Artifact) -> Option<&Path> {
        match artifact {
            Artifact::Original => self.original.as_deref(),
            Artifact::RawSpectrum => self.raw_spectrum.as_deref(),
            Artifact::CenteredSpectrum => self.centered_spectrum.as_deref(),
            Artifact::FilteredSpectrum => self.filtered_spectrum.as_deref(),
            Artifact::RestoredSpectrum => self.restored_spectrum.as_deref(),
            Artifact::Reconstructed => self.reconstructed.as_deref(),
        }
    }
}

/// Everything needed for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Image to filter.
    pub input: Option<PathBuf>,
    /// Cutoff radius, in frequency cells.
    pub cutoff: f64,
    /// Low-pass or high-pass.
    pub mode: FilterMode,
    /// Transform algorithm and worker count.
    pub engine: TransformEngine,
    /// Rendering of all-zero spectrum channels.
    pub degenerate: DegenerateChannel,
    /// Destinations of the intermediate pictures.
    pub outputs: OutputPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: None,
            cutoff: 12.5,
            mode: FilterMode::LowPass,
            engine: TransformEngine::default(),
            degenerate: DegenerateChannel::Blank,
            outputs: OutputPaths::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Assemble the pipeline, validating the cutoff.
    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new(
            self.engine,
            IdealFilter::new(self.cutoff, self.mode)?,
            SpectrumVisualizer::new(self.degenerate),
        ))
    }
}
