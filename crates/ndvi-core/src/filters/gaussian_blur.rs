use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix3};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{GAUSSIAN_TRUNCATE, MAX_KERNEL_RADIUS};
use crate::error::{NdviError, Result};

/// Numeric treatment of blurred samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurPrecision {
    /// Keep the f32 convolution result.
    #[default]
    Float,
    /// Round to the nearest integer, matching a blur written back into an
    /// integer sample buffer.
    Integer,
}

impl std::fmt::Display for BlurPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float => write!(f, "Float"),
            Self::Integer => write!(f, "Integer"),
        }
    }
}

/// Blur every band of a dynamically-ranked array.
///
/// Only (height, width, bands) input is accepted; any other rank is an
/// `InvalidShape` error.
pub fn blur_bands_dyn<T>(
    data: &ArrayViewD<'_, T>,
    sigma: f32,
    precision: BlurPrecision,
) -> Result<Array3<f32>>
where
    T: AsPrimitive<f32>,
{
    if data.ndim() != 3 {
        return Err(NdviError::shape("(height, width, bands)", data.shape()));
    }
    let view = data.view().into_dimensionality::<Ix3>()?;
    Ok(blur_bands(&view, sigma, precision))
}

/// Apply an isotropic Gaussian blur to each band independently.
pub fn blur_bands<T>(data: &ArrayView3<'_, T>, sigma: f32, precision: BlurPrecision) -> Array3<f32>
where
    T: AsPrimitive<f32>,
{
    let (h, w, bands) = data.dim();
    debug!(height = h, width = w, bands, sigma, %precision, "Blurring bands");

    let mut out = Array3::<f32>::zeros((h, w, bands));
    for (band, mut dst) in out.axis_iter_mut(Axis(2)).enumerate() {
        let plane = data.index_axis(Axis(2), band).mapv(|v| v.as_());
        let blurred = gaussian_blur_array(&plane.view(), sigma);
        match precision {
            BlurPrecision::Float => dst.assign(&blurred),
            BlurPrecision::Integer => dst.assign(&blurred.mapv(f32::round)),
        }
    }
    out
}

/// Apply Gaussian blur to a single plane using separable 1D convolution.
pub fn gaussian_blur_array(data: &ArrayView2<'_, f32>, sigma: f32) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.to_owned();
    }
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve_rows(data, &kernel);
    convolve_cols(&row_pass.view(), &kernel)
}

/// Normalised 1D Gaussian kernel truncated at `GAUSSIAN_TRUNCATE` sigmas.
///
/// A non-positive or non-finite sigma yields the identity kernel. The
/// half-width never exceeds `MAX_KERNEL_RADIUS`.
pub fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = ((GAUSSIAN_TRUNCATE * sigma + 0.5) as usize).min(MAX_KERNEL_RADIUS);
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Mirror an out-of-range index back into `0..len` (d c b a | a b c d).
fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

fn convolve_rows(data: &ArrayView2<'_, f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let mut result = Array2::<f32>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_col = reflect_index(col as isize + ki as isize - radius as isize, w);
                sum += data[[row, src_col]] * kv;
            }
            result[[row, col]] = sum;
        }
    }
    result
}

fn convolve_cols(data: &ArrayView2<'_, f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let mut result = Array2::<f32>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_row = reflect_index(row as isize + ki as isize - radius as isize, h);
                sum += data[[src_row, col]] * kv;
            }
            result[[row, col]] = sum;
        }
    }
    result
}
