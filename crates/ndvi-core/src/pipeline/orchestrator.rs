use std::sync::Arc;

use ndarray::{ArrayView3, Axis};
use num_traits::AsPrimitive;
use tracing::{debug, info};

use crate::classify::{class_histogram, classify};
use crate::encode::encode;
use crate::error::{NdviError, Result};
use crate::filters::gaussian_blur::blur_bands;
use crate::io::npy::save_npy;
use crate::io::raster_io::{load_raster, save_encoded};
use crate::ndvi::{ndvi_from_pixels, NdviStats};

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};

/// Run every in-memory stage on an (height, width, bands) array.
///
/// No I/O happens here; `source` on the result is left empty.
pub fn process_pixels<T>(
    pixels: &ArrayView3<'_, T>,
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput>
where
    T: AsPrimitive<f32>,
{
    let table = &config.classification;
    table.validate()?;
    if let Some(ref smoothing) = config.smoothing {
        smoothing.validate()?;
    }

    let bands = pixels.len_of(Axis(2));
    let required = config.bands.required_bands();
    if bands < required {
        return Err(NdviError::BandIndexOutOfRange {
            index: required - 1,
            bands,
        });
    }

    let ndvi = match config.smoothing {
        Some(ref smoothing) => {
            reporter.begin_stage(PipelineStage::Smoothing);
            let blurred = blur_bands(pixels, smoothing.sigma, smoothing.precision);
            info!(sigma = smoothing.sigma, precision = %smoothing.precision, "Smoothed bands");
            reporter.finish_stage();

            reporter.begin_stage(PipelineStage::ComputingNdvi);
            ndvi_from_pixels(&blurred.view(), &config.bands, &config.ndvi)?
        }
        None => {
            reporter.begin_stage(PipelineStage::ComputingNdvi);
            ndvi_from_pixels(pixels, &config.bands, &config.ndvi)?
        }
    };
    if let Some(stats) = NdviStats::compute(&ndvi.view()) {
        info!(
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            epsilon = config.ndvi.epsilon,
            "Computed NDVI"
        );
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Classifying);
    let labels = classify(&ndvi.view(), table)?;
    for (label, count) in class_histogram(&labels.view()) {
        debug!(label, count, "Class size");
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Encoding);
    let max_label = table.max_label().unwrap_or(0);
    let encoded = encode(&labels.view(), &config.encoding, max_label)?;
    info!(
        channels = config.encoding.channels,
        depth = %config.encoding.depth,
        scale = config.encoding.resolve_scale(max_label),
        "Encoded labels"
    );
    reporter.finish_stage();

    Ok(PipelineOutput {
        ndvi,
        labels,
        encoded,
        source: None,
    })
}

/// Run the full pipeline with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    reporter.begin_stage(PipelineStage::Reading);
    let (pixels, source) = load_raster(&config.input)?;
    reporter.finish_stage();

    let mut output = process_pixels(&pixels.view(), config, reporter.as_ref())?;

    reporter.begin_stage(PipelineStage::Writing);
    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save_encoded(&output.encoded, &config.output)?;
    if config.raw_output.labels() {
        save_npy(&output.labels.view().into_dyn(), &config.labels_raw_path())?;
    }
    if config.raw_output.ndvi() {
        save_npy(&output.ndvi.view().into_dyn(), &config.ndvi_raw_path())?;
    }
    reporter.finish_stage();

    output.source = Some(source);
    Ok(output)
}

/// Run the full processing pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
