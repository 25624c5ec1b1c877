use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NdviError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No raster found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid array shape: expected {expected}, got {actual}")]
    InvalidShape { expected: String, actual: String },

    #[error("Band index {index} out of range (bands: {bands})")]
    BandIndexOutOfRange { index: usize, bands: usize },

    #[error(
        "Invalid blur sigma {0} (expected a finite value in 0..={max})",
        max = crate::consts::MAX_BLUR_SIGMA
    )]
    InvalidSigma(f32),

    #[error("Invalid threshold table: {0}")]
    InvalidThreshold(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("Unsupported channel count for raster export: {0}")]
    UnsupportedChannelCount(usize),

    #[error("Invalid NPY file: {0}")]
    InvalidNpy(String),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl NdviError {
    /// Shape mismatch with formatted dimension lists.
    pub(crate) fn shape(expected: impl Into<String>, actual: &[usize]) -> Self {
        Self::InvalidShape {
            expected: expected.into(),
            actual: format!("{actual:?}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, NdviError>;
