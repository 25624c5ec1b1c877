use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, ImageFormat};
use ndarray::{Array3, ArrayViewD};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::{error, info, warn};

use crate::encode::{EncodedRaster, OutputDepth};
use crate::error::{NdviError, Result};
use crate::raster::{PixelArray, RasterInfo};

/// List the `.tif`/`.tiff` files directly inside `dir`, sorted by name.
pub fn find_rasters(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(NdviError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_tiff(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_tiff(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("tif" | "tiff")
    )
}

/// Resolve a file path as-is, or a directory to its first raster.
pub fn resolve_raster_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        let files = find_rasters(path)?;
        if files.len() > 1 {
            info!(count = files.len(), "Multiple rasters found, using the first");
        }
        return files.into_iter().next().ok_or_else(|| NdviError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Err(NdviError::NotFound {
        path: path.to_path_buf(),
    })
}

/// Load a multi-band TIFF into an (height, width, bands) u16 array.
///
/// Any number of unsigned 8- or 16-bit samples per pixel is accepted, stored
/// pixel-interleaved or band-interleaved. 8-bit samples are widened to 16-bit
/// without rescaling.
pub fn load_raster(path: &Path) -> Result<(PixelArray, RasterInfo)> {
    let resolved = resolve_raster_path(path)?;
    let file = File::open(&resolved)?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());
    let (width, height) = decoder.dimensions()?;
    let color = decoder.colortype()?;
    let bands = usize::from(color.num_samples());

    let mut result = DecodingResult::U16(Vec::new());
    let layout = decoder.read_image_to_buffer(&mut result)?;

    let (samples, bit_depth): (Vec<u16>, u8) = match result {
        DecodingResult::U8(buf) => (buf.into_iter().map(u16::from).collect(), 8),
        DecodingResult::U16(buf) => (buf, 16),
        _ => {
            return Err(NdviError::UnsupportedSampleFormat(format!(
                "{color:?} (only unsigned 8- and 16-bit samples are supported)"
            )))
        }
    };

    let (h, w) = (height as usize, width as usize);
    let expected = h * w * bands;
    if expected == 0 || samples.len() != expected {
        return Err(NdviError::InvalidShape {
            expected: format!("{h}x{w}x{bands} samples"),
            actual: format!("{} samples", samples.len()),
        });
    }

    // Band-interleaved files decode plane by plane: (bands, height, width).
    let data = if layout.planes > 1 {
        Array3::from_shape_vec((bands, h, w), samples)?
            .permuted_axes([1, 2, 0])
            .as_standard_layout()
            .into_owned()
    } else {
        Array3::from_shape_vec((h, w, bands), samples)?
    };

    info!(
        path = %resolved.display(),
        width = w,
        height = h,
        bands,
        bit_depth,
        planes = layout.planes,
        "Loaded raster"
    );

    let info = RasterInfo {
        path: resolved,
        width: w,
        height: h,
        bands,
        bit_depth,
    };
    Ok((data, info))
}

/// Sample types that can be written as raster images.
pub trait RasterSample: Copy + 'static {
    const DEPTH: OutputDepth;

    fn to_dynamic_image(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<Self>,
    ) -> Result<DynamicImage>;
}

impl RasterSample for u8 {
    const DEPTH: OutputDepth = OutputDepth::Eight;

    fn to_dynamic_image(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<DynamicImage> {
        let img = match channels {
            1 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
            3 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
            n => return Err(NdviError::UnsupportedChannelCount(n)),
        };
        img.ok_or_else(|| buffer_mismatch(width, height, channels))
    }
}

impl RasterSample for u16 {
    const DEPTH: OutputDepth = OutputDepth::Sixteen;

    fn to_dynamic_image(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u16>,
    ) -> Result<DynamicImage> {
        let img = match channels {
            1 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma16),
            3 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb16),
            4 => ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba16),
            n => return Err(NdviError::UnsupportedChannelCount(n)),
        };
        img.ok_or_else(|| buffer_mismatch(width, height, channels))
    }
}

fn buffer_mismatch(width: u32, height: u32, channels: usize) -> NdviError {
    NdviError::InvalidShape {
        expected: format!("{height}x{width}x{channels} samples"),
        actual: "a buffer of different length".into(),
    }
}

/// Write an (height, width, channels) array as an image.
///
/// The format follows the file extension (PNG for `.png`, TIFF otherwise).
/// Arrays of any other rank are rejected. Writing anything narrower than
/// 16-bit logs a warning, since small label values are hard to tell apart in
/// narrow sample ranges.
pub fn save_raster<T: RasterSample>(array: &ArrayViewD<'_, T>, path: &Path) -> Result<()> {
    if array.ndim() != 3 {
        error!(shape = ?array.shape(), "Refusing to save non-3D array as raster");
        return Err(NdviError::shape("(height, width, channels)", array.shape()));
    }
    let depth = T::DEPTH;
    if depth != OutputDepth::Sixteen {
        warn!(
            %depth,
            recommended = %OutputDepth::Sixteen,
            "Saving raster with non-default sample depth"
        );
    }

    let (h, w, channels) = (array.shape()[0], array.shape()[1], array.shape()[2]);
    let data: Vec<T> = array.iter().copied().collect();
    let img = T::to_dynamic_image(w as u32, h as u32, channels, data)?;

    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => ImageFormat::Png,
        _ => ImageFormat::Tiff,
    };
    img.save_with_format(path, format)?;
    info!(path = %path.display(), width = w, height = h, channels, "Saved raster");
    Ok(())
}

/// Write an encoded label raster.
pub fn save_encoded(encoded: &EncodedRaster, path: &Path) -> Result<()> {
    match encoded {
        EncodedRaster::U8(a) => save_raster(&a.view().into_dyn(), path),
        EncodedRaster::U16(a) => save_raster(&a.view().into_dyn(), path),
    }
}
