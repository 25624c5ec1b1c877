use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ndvi_core::pipeline::config::{PipelineConfig, SmoothingConfig};
use ndvi_core::pipeline::{run_pipeline_reported, PipelineStage, ProgressReporter};
use tracing::info;

use super::{DepthArg, ProfileArg};
use crate::summary::{print_output_summary, print_pipeline_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Input raster file or directory (uses the first raster found)
    #[arg(default_value = "./input_images/")]
    pub input: PathBuf,

    /// Pipeline config file (TOML); overrides all other options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset to start from
    #[arg(long, value_enum, default_value = "labels")]
    pub profile: ProfileArg,

    /// Gaussian blur sigma applied to every band before NDVI
    #[arg(long)]
    pub sigma: Option<f32>,

    /// Disable smoothing even if the profile enables it
    #[arg(long)]
    pub no_blur: bool,

    /// Epsilon added to every NDVI denominator
    #[arg(long)]
    pub epsilon: Option<f32>,

    /// Output sample depth
    #[arg(long, value_enum)]
    pub depth: Option<DepthArg>,

    /// Number of channels in the output raster
    #[arg(long)]
    pub channels: Option<usize>,

    /// Scale factor applied to each label
    #[arg(long)]
    pub scale: Option<u16>,

    /// Output file path
    #[arg(short, long, default_value = "./output_labels/labels.tif")]
    pub output: PathBuf,
}

/// Drives an indicatif spinner from pipeline stage events.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        PipelineConfig::from_toml_str(&contents).context("Invalid pipeline config")?
    } else {
        build_config_from_args(args)
    };

    print_pipeline_summary(&config);

    let stages = if config.smoothing.is_some() { 6 } else { 5 };
    let bar = ProgressBar::new(stages);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { bar: bar.clone() });

    let output = run_pipeline_reported(&config, reporter)
        .with_context(|| format!("Pipeline failed for {}", config.input.display()))?;
    bar.finish_with_message("Done");
    info!(output = %config.output.display(), "Pipeline complete");

    print_output_summary(&config, &output);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> PipelineConfig {
    let mut config =
        PipelineConfig::from_profile(args.profile.into(), args.input.clone(), args.output.clone());

    if args.no_blur {
        config.smoothing = None;
    } else if let Some(sigma) = args.sigma {
        let precision = config.smoothing.map(|s| s.precision).unwrap_or_default();
        config.smoothing = Some(SmoothingConfig { sigma, precision });
    }
    if let Some(epsilon) = args.epsilon {
        config.ndvi.epsilon = epsilon;
    }
    if let Some(depth) = args.depth {
        config.encoding.depth = depth.into();
    }
    if let Some(channels) = args.channels {
        config.encoding.channels = channels;
    }
    if args.scale.is_some() {
        config.encoding.scale = args.scale;
    }
    config
}
