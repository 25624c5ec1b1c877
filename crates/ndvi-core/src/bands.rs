use ndarray::{Array2, ArrayView3, Axis};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::consts::{NIR_BAND_INDEX, RED_BAND_INDEX};
use crate::error::{NdviError, Result};

/// Positions of the Red and NIR bands within the band axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    pub red_index: usize,
    pub nir_index: usize,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            red_index: RED_BAND_INDEX,
            nir_index: NIR_BAND_INDEX,
        }
    }
}

impl BandConfig {
    /// Highest band index this config touches, plus one.
    pub fn required_bands(&self) -> usize {
        self.red_index.max(self.nir_index) + 1
    }
}

/// Red and NIR bands as f32 planes.
#[derive(Clone, Debug)]
pub struct RedNir {
    pub red: Array2<f32>,
    pub nir: Array2<f32>,
}

/// Extract a single band as f32.
pub fn extract_band<T>(pixels: &ArrayView3<'_, T>, index: usize) -> Result<Array2<f32>>
where
    T: AsPrimitive<f32>,
{
    let bands = pixels.len_of(Axis(2));
    if index >= bands {
        return Err(NdviError::BandIndexOutOfRange { index, bands });
    }
    Ok(pixels.index_axis(Axis(2), index).mapv(|v| v.as_()))
}

/// Pull the Red and NIR bands out of an (H, W, B) array.
pub fn extract_red_nir<T>(pixels: &ArrayView3<'_, T>, config: &BandConfig) -> Result<RedNir>
where
    T: AsPrimitive<f32>,
{
    let red = extract_band(pixels, config.red_index)?;
    let nir = extract_band(pixels, config.nir_index)?;
    Ok(RedNir { red, nir })
}

