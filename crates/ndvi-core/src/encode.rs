use ndarray::{Array3, ArrayView2, Axis};
use num_traits::{SaturatingMul, Zero};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::RGB_CHANNEL_COUNT;
use crate::error::{NdviError, Result};

/// Sample width of an exported raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputDepth {
    Eight,
    #[default]
    Sixteen,
}

impl OutputDepth {
    pub fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    pub fn max_value(self) -> u16 {
        match self {
            Self::Eight => u8::MAX as u16,
            Self::Sixteen => u16::MAX,
        }
    }
}

impl std::fmt::Display for OutputDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Number of identical channels in the exported raster.
    pub channels: usize,
    pub depth: OutputDepth,
    /// Multiplier applied to every label. Derived from the depth and the
    /// highest label when absent.
    #[serde(default)]
    pub scale: Option<u16>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            channels: RGB_CHANNEL_COUNT,
            depth: OutputDepth::Sixteen,
            scale: None,
        }
    }
}

impl EncodingConfig {
    /// Scale factor to use when the highest label in play is `max_label`.
    pub fn resolve_scale(&self, max_label: u8) -> u16 {
        match self.scale {
            Some(s) => s,
            None if max_label == 0 => 1,
            None => self.depth.max_value() / max_label as u16,
        }
    }
}

/// Display-ready label raster.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedRaster {
    U8(Array3<u8>),
    U16(Array3<u16>),
}

impl EncodedRaster {
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            Self::U8(a) => a.dim(),
            Self::U16(a) => a.dim(),
        }
    }

    pub fn depth(&self) -> OutputDepth {
        match self {
            Self::U8(_) => OutputDepth::Eight,
            Self::U16(_) => OutputDepth::Sixteen,
        }
    }
}

/// Replicate `label * scale` across `channels` channels.
///
/// Labels are widened to `T` before multiplying; products beyond `T::MAX`
/// saturate.
pub fn encode_labels<T>(labels: &ArrayView2<'_, u8>, channels: usize, scale: T) -> Result<Array3<T>>
where
    T: Copy + Zero + From<u8> + SaturatingMul,
{
    if channels == 0 {
        return Err(NdviError::shape(
            "at least one output channel",
            &[labels.nrows(), labels.ncols(), 0],
        ));
    }

    let (h, w) = labels.dim();
    let scaled = labels.mapv(|l| T::from(l).saturating_mul(&scale));
    let mut out = Array3::<T>::zeros((h, w, channels));
    for mut channel in out.axis_iter_mut(Axis(2)) {
        channel.assign(&scaled);
    }
    Ok(out)
}

/// Encode labels according to `config`, picking the sample type from its depth.
pub fn encode(
    labels: &ArrayView2<'_, u8>,
    config: &EncodingConfig,
    max_label: u8,
) -> Result<EncodedRaster> {
    let scale = config.resolve_scale(max_label);
    match config.depth {
        OutputDepth::Eight => {
            let scale = u8::try_from(scale).unwrap_or_else(|_| {
                warn!(scale, "Scale factor exceeds 8-bit range, clamping to 255");
                u8::MAX
            });
            Ok(EncodedRaster::U8(encode_labels(labels, config.channels, scale)?))
        }
        OutputDepth::Sixteen => Ok(EncodedRaster::U16(encode_labels(
            labels,
            config.channels,
            scale,
        )?)),
    }
}
