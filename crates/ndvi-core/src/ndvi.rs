use ndarray::{Array2, ArrayView2, ArrayView3, Zip};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::bands::{extract_red_nir, BandConfig};
use crate::consts::UTILS_EPSILON;
use crate::error::{NdviError, Result};
use crate::raster::NdviArray;

/// NDVI computation settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NdviConfig {
    /// Added to every denominator, unconditionally.
    pub epsilon: f32,
}

impl Default for NdviConfig {
    fn default() -> Self {
        Self {
            epsilon: UTILS_EPSILON,
        }
    }
}

/// NDVI = (NIR - Red) / (NIR + Red + epsilon), elementwise.
///
/// The epsilon biases every pixel slightly towards zero; both bands at zero
/// yield exactly 0.0 instead of NaN. No clamping is applied.
pub fn compute_ndvi(
    red: &ArrayView2<'_, f32>,
    nir: &ArrayView2<'_, f32>,
    epsilon: f32,
) -> Result<NdviArray> {
    if red.dim() != nir.dim() {
        return Err(NdviError::InvalidShape {
            expected: format!("{:?}", red.shape()),
            actual: format!("{:?}", nir.shape()),
        });
    }

    let mut out = Array2::<f32>::zeros(red.dim());
    Zip::from(&mut out)
        .and(red)
        .and(nir)
        .for_each(|o, &r, &n| *o = (n - r) / (n + r + epsilon));
    Ok(out)
}

/// Extract Red/NIR from a multi-band array and compute NDVI in one step.
pub fn ndvi_from_pixels<T>(
    pixels: &ArrayView3<'_, T>,
    bands: &BandConfig,
    config: &NdviConfig,
) -> Result<NdviArray>
where
    T: AsPrimitive<f32>,
{
    let planes = extract_red_nir(pixels, bands)?;
    compute_ndvi(&planes.red.view(), &planes.nir.view(), config.epsilon)
}

/// Summary statistics over the finite values of an NDVI array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NdviStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub finite_count: usize,
}

impl NdviStats {
    pub fn compute(ndvi: &ArrayView2<'_, f32>) -> Option<Self> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for &v in ndvi.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            count += 1;
        }

        if count == 0 {
            return None;
        }
        Some(Self {
            min,
            max,
            mean: sum / count as f64,
            finite_count: count,
        })
    }
}
