// SPDX-License-Identifier: MPL-2.0

//! The filtering pipeline: load, transform, center, filter, restore, invert.
//!
//! Each stage is a pure function of the previous stage's output. The
//! intermediate pictures are handed to an [`ImageSink`] as soon as they
//! exist, so a failure late in the run still leaves the earlier ones.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::info;
use thiserror::Error;

use crate::config::OutputPaths;
use crate::error::{Error, Result};
use crate::filter::IdealFilter;
use crate::grid::{FrequencyGrid, PixelGrid};
use crate::io;
use crate::shuffle::quadrant_shuffle;
use crate::spectrum::SpectrumVisualizer;
use crate::transform::TransformEngine;

/// Steps of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Decode the input image.
    Load,
    /// Forward transform.
    Forward,
    /// Render the raw spectrum.
    RawSpectrum,
    /// Bring the zero frequency to the center.
    Center,
    /// Render the centered spectrum.
    CenteredSpectrum,
    /// Apply the ideal filter.
    Filter,
    /// Render the filtered spectrum.
    FilteredSpectrum,
    /// Bring the zero frequency back to the corner.
    Uncenter,
    /// Render the spectrum fed to the inverse transform.
    RestoredSpectrum,
    /// Inverse transform.
    Inverse,
    /// Hand a picture to the sink.
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Forward => "forward transform",
            Stage::RawSpectrum => "raw spectrum",
            Stage::Center => "center",
            Stage::CenteredSpectrum => "centered spectrum",
            Stage::Filter => "filter",
            Stage::FilteredSpectrum => "filtered spectrum",
            Stage::Uncenter => "uncenter",
            Stage::RestoredSpectrum => "restored spectrum",
            Stage::Inverse => "inverse transform",
            Stage::Save => "save",
        })
    }
}

/// Pictures produced along a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// The input image.
    Original,
    /// Spectrum straight out of the forward transform.
    RawSpectrum,
    /// Spectrum with the zero frequency at the center.
    CenteredSpectrum,
    /// Centered spectrum after filtering.
    FilteredSpectrum,
    /// Filtered spectrum with the zero frequency back in the corner.
    RestoredSpectrum,
    /// The filtered image.
    Reconstructed,
}

impl Artifact {
    /// Every artifact, in production order.
    pub const ALL: [Artifact; 6] = [
        Artifact::Original,
        Artifact::RawSpectrum,
        Artifact::CenteredSpectrum,
        Artifact::FilteredSpectrum,
        Artifact::RestoredSpectrum,
        Artifact::Reconstructed,
    ];

    fn stage(self) -> Stage {
        match self {
            Artifact::Original => Stage::Load,
            Artifact::RawSpectrum => Stage::RawSpectrum,
            Artifact::CenteredSpectrum => Stage::CenteredSpectrum,
            Artifact::FilteredSpectrum => Stage::FilteredSpectrum,
            Artifact::RestoredSpectrum => Stage::RestoredSpectrum,
            Artifact::Reconstructed => Stage::Inverse,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Artifact::Original => "original",
            Artifact::RawSpectrum => "raw spectrum",
            Artifact::CenteredSpectrum => "centered spectrum",
            Artifact::FilteredSpectrum => "filtered spectrum",
            Artifact::RestoredSpectrum => "restored spectrum",
            Artifact::Reconstructed => "reconstructed",
        })
    }
}

/// Receiver of the pictures produced along a run.
pub trait ImageSink {
    /// Whether `artifact` should be produced at all.
    ///
    /// Spectrum renders the sink does not want are skipped.
    fn wants(&self, _artifact: Artifact) -> bool {
        true
    }

    /// Take one picture.
    fn accept(&mut self, artifact: Artifact, image: &PixelGrid) -> Result<()>;
}

/// Discards everything.
impl ImageSink for () {
    fn wants(&self, _artifact: Artifact) -> bool {
        false
    }

    fn accept(&mut self, _artifact: Artifact, _image: &PixelGrid) -> Result<()> {
        Ok(())
    }
}

/// Keeps every picture in memory.
impl ImageSink for Vec<(Artifact, PixelGrid)> {
    fn accept(&mut self, artifact: Artifact, image: &PixelGrid) -> Result<()> {
        self.push((artifact, image.clone()));
        Ok(())
    }
}

/// Writes the configured artifacts to disk.
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    outputs: OutputPaths,
}

impl FileSink {
    /// Sink writing each artifact to its path in `outputs`.
    pub fn new(outputs: OutputPaths) -> Self {
        Self { outputs }
    }
}

impl ImageSink for FileSink {
    fn wants(&self, artifact: Artifact) -> bool {
        self.outputs.path(artifact).is_some()
    }

    fn accept(&mut self, artifact: Artifact, image: &PixelGrid) -> Result<()> {
        if let Some(path) = self.outputs.path(artifact) {
            io::save(image, path)?;
            info!("wrote {artifact} to {}", path.display());
        }
        Ok(())
    }
}

/// A failed run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// Where the run stopped.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub source: Error,
}

/// What a successful run leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The filtered spectrum, centered.
    pub filtered: FrequencyGrid,
    /// The filtered image.
    pub image: PixelGrid,
}

/// Load → forward → center → filter → uncenter → inverse, with a spectrum
/// render after each frequency-domain step.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    engine: TransformEngine,
    filter: IdealFilter,
    visualizer: SpectrumVisualizer,
}

impl Pipeline {
    /// Assemble a pipeline from its stages.
    pub fn new(engine: TransformEngine, filter: IdealFilter, visualizer: SpectrumVisualizer) -> Self {
        Self {
            engine,
            filter,
            visualizer,
        }
    }

    /// Load `path` then [`run`](Self::run).
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        sink: &mut dyn ImageSink,
    ) -> std::result::Result<PipelineOutput, PipelineError> {
        let image = stage(Stage::Load, || io::load(path))?;
        self.run(&image, sink)
    }

    /// Filter `image`, handing every wanted picture to `sink`.
    pub fn run(
        &self,
        image: &PixelGrid,
        sink: &mut dyn ImageSink,
    ) -> std::result::Result<PipelineOutput, PipelineError> {
        emit(sink, Artifact::Original, image)?;

        let spectrum = stage(Stage::Forward, || self.engine.forward(image))?;
        self.render(sink, Artifact::RawSpectrum, &spectrum)?;

        let centered = stage(Stage::Center, || Ok(quadrant_shuffle(&spectrum)))?;
        self.render(sink, Artifact::CenteredSpectrum, &centered)?;

        let filtered = stage(Stage::Filter, || Ok(self.filter.apply(&centered)))?;
        self.render(sink, Artifact::FilteredSpectrum, &filtered)?;

        let restored = stage(Stage::Uncenter, || Ok(quadrant_shuffle(&filtered)))?;
        self.render(sink, Artifact::RestoredSpectrum, &restored)?;

        let reconstructed = stage(Stage::Inverse, || self.engine.inverse(&restored))?;
        emit(sink, Artifact::Reconstructed, &reconstructed)?;

        Ok(PipelineOutput {
            filtered,
            image: reconstructed,
        })
    }

    fn render(
        &self,
        sink: &mut dyn ImageSink,
        artifact: Artifact,
        spectrum: &FrequencyGrid,
    ) -> std::result::Result<(), PipelineError> {
        if !sink.wants(artifact) {
            return Ok(());
        }
        let picture = stage(artifact.stage(), || self.visualizer.render(spectrum))?;
        emit(sink, artifact, &picture)
    }
}

/// Run one stage, timing it and tagging its error.
fn stage<T>(stage: Stage, f: impl FnOnce() -> Result<T>) -> std::result::Result<T, PipelineError> {
    let now = Instant::now();
    let out = f().map_err(|source| PipelineError { stage, source })?;
    info!("{stage}: {}ms", now.elapsed().as_millis());
    Ok(out)
}

fn emit(
    sink: &mut dyn ImageSink,
    artifact: Artifact,
    image: &PixelGrid,
) -> std::result::Result<(), PipelineError> {
    if !sink.wants(artifact) {
        return Ok(());
    }
    sink.accept(artifact, image).map_err(|source| PipelineError {
        stage: Stage::Save,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::spectrum::DegenerateChannel;

    fn pipeline(radius: f64, mode: FilterMode) -> Pipeline {
        Pipeline::new(
            TransformEngine::reference(),
            IdealFilter::new(radius, mode).unwrap(),
            SpectrumVisualizer::default(),
        )
    }

    fn checker(width: usize, height: usize) -> PixelGrid {
        PixelGrid::from_fn(width, height, |row, col| {
            if (row + col) % 2 == 0 {
                [200, 50, 120]
            } else {
                [20, 180, 60]
            }
        })
        .unwrap()
    }

    #[test]
    fn every_artifact_reaches_the_sink_in_order() {
        let mut sink: Vec<(Artifact, PixelGrid)> = Vec::new();
        let image = checker(6, 4);
        let output = pipeline(1.0, FilterMode::LowPass).run(&image, &mut sink).unwrap();
        let order: Vec<Artifact> = sink.iter().map(|(a, _)| *a).collect();
        assert_eq!(order, Artifact::ALL);
        assert_eq!(sink[0].1, image);
        assert_eq!(sink[5].1, output.image);
        assert!(sink.iter().all(|(_, grid)| (grid.width(), grid.height()) == (6, 4)));
    }

    #[test]
    fn wide_low_pass_reproduces_the_image() {
        let image = checker(4, 4);
        let output = pipeline(100.0, FilterMode::LowPass).run(&image, &mut ()).unwrap();
        for (a, b) in output.image.pixels().iter().zip(image.pixels()) {
            for c in 0..3 {
                assert!((a[c] as i16 - b[c] as i16).abs() <= 1, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn narrow_low_pass_flattens_a_checkerboard() {
        // Only the DC term survives a zero radius: every pixel becomes the mean.
        let image = checker(4, 4);
        let output = pipeline(0.0, FilterMode::LowPass).run(&image, &mut ()).unwrap();
        assert!(output.image.pixels().iter().all(|&p| p == [110, 115, 90]));
    }

    #[test]
    fn high_pass_removes_the_mean() {
        let image = PixelGrid::filled(4, 4, [90, 90, 90]).unwrap();
        let output = pipeline(1.0, FilterMode::HighPass).run(&image, &mut ()).unwrap();
        assert!(output.image.pixels().iter().all(|&p| p == [0, 0, 0]));
    }

    #[test]
    fn errors_name_the_failing_stage() {
        let image = PixelGrid::filled(1, 3, [1, 1, 1]).unwrap();
        let err = pipeline(1.0, FilterMode::LowPass).run(&image, &mut ()).unwrap_err();
        assert_eq!(err.stage, Stage::Forward);
        assert!(matches!(err.source, Error::InvalidDimension { .. }));

        // A high-pass wider than the spectrum leaves nothing to render.
        let strict = Pipeline::new(
            TransformEngine::reference(),
            IdealFilter::high_pass(100.0).unwrap(),
            SpectrumVisualizer::new(DegenerateChannel::Reject),
        );
        let mut sink: Vec<(Artifact, PixelGrid)> = Vec::new();
        let err = strict.run(&checker(4, 4), &mut sink).unwrap_err();
        assert_eq!(err.stage, Stage::FilteredSpectrum);
        assert!(matches!(err.source, Error::DegenerateSpectrum { channel: 0 }));
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn unwanted_spectra_are_not_rendered() {
        let strict = Pipeline::new(
            TransformEngine::reference(),
            IdealFilter::high_pass(100.0).unwrap(),
            SpectrumVisualizer::new(DegenerateChannel::Reject),
        );
        let output = strict.run(&checker(4, 4), &mut ()).unwrap();
        assert!(output.image.pixels().iter().all(|&p| p == [0, 0, 0]));
    }
}
