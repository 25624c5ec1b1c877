pub mod config;
pub mod info;
pub mod pipeline;

use clap::ValueEnum;
use ndvi_core::encode::OutputDepth;
use ndvi_core::pipeline::config::Profile;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProfileArg {
    /// Unsmoothed, upper-inclusive bands, 8-bit single channel
    Labels,
    /// Gaussian-smoothed, half-open bands, 16-bit RGB
    Smoothed,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Labels => Profile::Labels,
            ProfileArg::Smoothed => Profile::Smoothed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DepthArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

impl From<DepthArg> for OutputDepth {
    fn from(arg: DepthArg) -> Self {
        match arg {
            DepthArg::Eight => OutputDepth::Eight,
            DepthArg::Sixteen => OutputDepth::Sixteen,
        }
    }
}
