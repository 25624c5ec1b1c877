pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{process_pixels, run_pipeline, run_pipeline_reported};
pub use types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};
