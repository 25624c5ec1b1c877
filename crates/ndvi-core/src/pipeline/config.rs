use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bands::BandConfig;
use crate::classify::ThresholdTable;
use crate::consts::{
    DEFAULT_BLUR_SIGMA, LABELS_EPSILON, MAX_BLUR_SIGMA, RAW_ARRAY_EXTENSION, UTILS_EPSILON,
};
use crate::encode::{EncodingConfig, OutputDepth};
use crate::error::{NdviError, Result};
use crate::filters::gaussian_blur::BlurPrecision;
use crate::io::npy::raw_output_path;
use crate::ndvi::NdviConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raster file, or a directory whose first raster is used.
    pub input: PathBuf,
    /// Encoded label raster destination.
    pub output: PathBuf,
    #[serde(default)]
    pub bands: BandConfig,
    pub smoothing: Option<SmoothingConfig>,
    #[serde(default)]
    pub ndvi: NdviConfig,
    #[serde(default)]
    pub classification: ThresholdTable,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub raw_output: RawOutput,
}

impl PipelineConfig {
    pub fn from_profile(profile: Profile, input: PathBuf, output: PathBuf) -> Self {
        match profile {
            Profile::Labels => Self {
                input,
                output,
                bands: BandConfig::default(),
                smoothing: None,
                ndvi: NdviConfig {
                    epsilon: LABELS_EPSILON,
                },
                classification: ThresholdTable::convention_a(),
                encoding: EncodingConfig {
                    channels: 1,
                    depth: OutputDepth::Eight,
                    scale: None,
                },
                raw_output: RawOutput::Labels,
            },
            Profile::Smoothed => Self {
                input,
                output,
                bands: BandConfig::default(),
                smoothing: Some(SmoothingConfig::default()),
                ndvi: NdviConfig {
                    epsilon: UTILS_EPSILON,
                },
                classification: ThresholdTable::convention_b(),
                encoding: EncodingConfig::default(),
                raw_output: RawOutput::Ndvi,
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Raw label dump: the output path with an `.npy` extension.
    pub fn labels_raw_path(&self) -> PathBuf {
        raw_output_path(&self.output)
    }

    /// Raw NDVI dump: `<stem>_ndvi.npy` next to the output.
    pub fn ndvi_raw_path(&self) -> PathBuf {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let name = format!("{stem}_ndvi.{RAW_ARRAY_EXTENSION}");
        match self.output.parent() {
            Some(parent) => parent.join(name),
            None => Path::new(&name).to_path_buf(),
        }
    }
}

/// Preset matching one of the two established ways of running the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    /// No smoothing, epsilon 1e-10, upper-inclusive bands, 8-bit single
    /// channel output, raw labels saved.
    #[default]
    Labels,
    /// Gaussian sigma 5, epsilon 1e-6, half-open bands, 16-bit RGB output,
    /// raw NDVI saved.
    Smoothed,
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Labels => write!(f, "Labels"),
            Self::Smoothed => write!(f, "Smoothed"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub sigma: f32,
    #[serde(default)]
    pub precision: BlurPrecision,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_BLUR_SIGMA,
            precision: BlurPrecision::default(),
        }
    }
}

impl SmoothingConfig {
    /// Reject NaN, infinite, negative and oversized sigmas.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_BLUR_SIGMA).contains(&self.sigma) {
            return Err(NdviError::InvalidSigma(self.sigma));
        }
        Ok(())
    }
}

/// Which intermediate arrays are dumped alongside the raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawOutput {
    None,
    #[default]
    Labels,
    Ndvi,
    Both,
}

impl RawOutput {
    pub fn labels(self) -> bool {
        matches!(self, Self::Labels | Self::Both)
    }

    pub fn ndvi(self) -> bool {
        matches!(self, Self::Ndvi | Self::Both)
    }
}

impl std::fmt::Display for RawOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Labels => write!(f, "Labels"),
            Self::Ndvi => write!(f, "NDVI"),
            Self::Both => write!(f, "Labels + NDVI"),
        }
    }
}
