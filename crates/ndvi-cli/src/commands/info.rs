use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ndvi_core::bands::BandConfig;
use ndvi_core::classify::{class_histogram, classify, ThresholdTable};
use ndvi_core::io::raster_io::load_raster;
use ndvi_core::ndvi::{ndvi_from_pixels, NdviConfig, NdviStats};

#[derive(Args)]
pub struct InfoArgs {
    /// Raster file, or directory containing rasters
    pub path: PathBuf,

    /// Red band index
    #[arg(long, default_value = "2")]
    pub red: usize,

    /// Near-infrared band index
    #[arg(long, default_value = "3")]
    pub nir: usize,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (pixels, info) = load_raster(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;

    println!("File:       {}", info.path.display());
    println!("Dimensions: {}x{}", info.width, info.height);
    println!("Bands:      {}", info.bands);
    println!("Bit depth:  {}", info.bit_depth);

    let bands = BandConfig {
        red_index: args.red,
        nir_index: args.nir,
    };
    let ndvi = ndvi_from_pixels(&pixels.view(), &bands, &NdviConfig::default())
        .context("Failed to compute NDVI")?;

    match NdviStats::compute(&ndvi.view()) {
        Some(stats) => {
            println!();
            println!("NDVI min:   {:.4}", stats.min);
            println!("NDVI max:   {:.4}", stats.max);
            println!("NDVI mean:  {:.4}", stats.mean);
        }
        None => println!("NDVI:       no finite values"),
    }

    let table = ThresholdTable::convention_b();
    let labels = classify(&ndvi.view(), &table)?;
    let total = info.pixel_count().max(1) as f64;
    println!();
    println!("Classes ({}):", table.bounds);
    for (label, count) in class_histogram(&labels.view()) {
        println!(
            "  {:>3}  {:>10}  {:>6.2}%",
            label,
            count,
            count as f64 / total * 100.0
        );
    }

    Ok(())
}
