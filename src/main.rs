// SPDX-License-Identifier: MPL-2.0

//! Filter an image in the frequency domain and write the intermediate pictures.

use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use fourier_filter::config::PipelineConfig;
use fourier_filter::filter::FilterMode;
use fourier_filter::pipeline::FileSink;
use fourier_filter::spectrum::DegenerateChannel;
use fourier_filter::transform::Algorithm;

/// Ideal low-pass / high-pass filtering of an image through its Fourier transform.
///
/// Flags override the values of the configuration file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Image to filter.
    input: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cutoff radius, in frequency cells.
    #[arg(short, long)]
    cutoff: Option<f64>,

    /// low-pass or high-pass.
    #[arg(short, long)]
    mode: Option<FilterMode>,

    /// direct (reference summation) or separable (FFT).
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Worker threads for the transforms, 1 to stay on the main thread.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Fail instead of rendering all-zero spectrum channels black.
    #[arg(long)]
    reject_degenerate: bool,

    /// Where to write the input image as decoded.
    #[arg(long)]
    original: Option<PathBuf>,

    /// Where to write the raw magnitude spectrum.
    #[arg(long)]
    raw_spectrum: Option<PathBuf>,

    /// Where to write the centered magnitude spectrum.
    #[arg(long)]
    centered_spectrum: Option<PathBuf>,

    /// Where to write the filtered magnitude spectrum.
    #[arg(long)]
    filtered_spectrum: Option<PathBuf>,

    /// Where to write the spectrum fed to the inverse transform.
    #[arg(long)]
    restored_spectrum: Option<PathBuf>,

    /// Where to write the filtered image.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        config.input = self.input.or(config.input);
        config.cutoff = self.cutoff.unwrap_or(config.cutoff);
        config.mode = self.mode.unwrap_or(config.mode);
        config.engine.algorithm = self.algorithm.unwrap_or(config.engine.algorithm);
        config.engine.workers = self.workers.or(config.engine.workers);
        if self.reject_degenerate {
            config.degenerate = DegenerateChannel::Reject;
        }
        let outputs = &mut config.outputs;
        outputs.original = self.original.or(outputs.original.take());
        outputs.raw_spectrum = self.raw_spectrum.or(outputs.raw_spectrum.take());
        outputs.centered_spectrum = self.centered_spectrum.or(outputs.centered_spectrum.take());
        outputs.filtered_spectrum = self.filtered_spectrum.or(outputs.filtered_spectrum.take());
        outputs.restored_spectrum = self.restored_spectrum.or(outputs.restored_spectrum.take());
        outputs.reconstructed = self.output.or(outputs.reconstructed.take());
        Ok(config)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.into_config()?;
    let input = config
        .input
        .clone()
        .ok_or("no input image, pass a path or set `input` in the config file")?;
    let pipeline = config.pipeline()?;
    info!(
        "{} filter, cutoff {}, {} transform",
        config.mode, config.cutoff, config.engine.algorithm
    );

    let mut sink = FileSink::new(config.outputs);
    let output = pipeline.run_file(&input, &mut sink)?;
    info!(
        "filtered {}x{} image from {}",
        output.image.width(),
        output.image.height(),
        input.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
