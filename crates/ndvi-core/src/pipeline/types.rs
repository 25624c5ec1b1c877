use crate::encode::EncodedRaster;
use crate::raster::{LabelArray, NdviArray, RasterInfo};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Smoothing,
    ComputingNdvi,
    Classifying,
    Encoding,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading raster"),
            Self::Smoothing => write!(f, "Smoothing bands"),
            Self::ComputingNdvi => write!(f, "Computing NDVI"),
            Self::Classifying => write!(f, "Classifying"),
            Self::Encoding => write!(f, "Encoding output"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Every array the pipeline produces for one input.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub ndvi: NdviArray,
    pub labels: LabelArray,
    pub encoded: EncodedRaster,
    /// Source metadata, present when the input came from disk.
    pub source: Option<RasterInfo>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
