use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ndvi_core::pipeline::config::PipelineConfig;

use super::ProfileArg;

#[derive(Args)]
pub struct ConfigArgs {
    /// Profile to start from
    #[arg(long, value_enum, default_value = "labels")]
    pub profile: ProfileArg,

    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a profile's PipelineConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = PipelineConfig::from_profile(
        args.profile.into(),
        PathBuf::from("input_images"),
        PathBuf::from("output_labels/labels.tif"),
    );
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
