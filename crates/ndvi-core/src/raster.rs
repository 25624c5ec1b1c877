use std::path::PathBuf;

use ndarray::{Array2, Array3};

/// Raw sensor samples, shape = (height, width, bands).
pub type PixelArray = Array3<u16>;

/// Per-pixel vegetation index, shape = (height, width).
pub type NdviArray = Array2<f32>;

/// Per-pixel class id, shape = (height, width).
pub type LabelArray = Array2<u8>;

/// Metadata about a loaded raster file.
#[derive(Clone, Debug)]
pub struct RasterInfo {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub bands: usize,
    /// Sample depth on disk before widening (8 or 16).
    pub bit_depth: u8,
}

impl RasterInfo {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
