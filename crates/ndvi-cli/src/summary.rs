use console::Style;
use ndvi_core::classify::class_histogram;
use ndvi_core::ndvi::NdviStats;
use ndvi_core::pipeline::config::PipelineConfig;
use ndvi_core::pipeline::PipelineOutput;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("NDVI Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Bands"),
        s.value.apply_to(format!(
            "red={} nir={}",
            config.bands.red_index, config.bands.nir_index
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Smoothing"));
    match config.smoothing {
        Some(ref sm) => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Sigma"),
                s.value.apply_to(sm.sigma)
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Precision"),
                s.method.apply_to(sm.precision)
            );
        }
        None => println!("    {}", s.disabled.apply_to("disabled")),
    }
    println!();

    println!("  {}", s.header.apply_to("NDVI"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Epsilon"),
        s.value.apply_to(format!("{:e}", config.ndvi.epsilon))
    );
    println!();

    let table = &config.classification;
    println!("  {}", s.header.apply_to("Classes"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Intervals"),
        s.method.apply_to(table.bounds)
    );
    for rule in &table.rules {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("Label {}", rule.label)),
            s.value.apply_to(format!("{} .. {}", rule.min, rule.max))
        );
    }
    println!();

    let max_label = table.max_label().unwrap_or(0);
    println!("  {}", s.header.apply_to("Encoding"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Depth"),
        s.method.apply_to(config.encoding.depth)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Channels"),
        s.value.apply_to(config.encoding.channels)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(config.encoding.resolve_scale(max_label))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Raw dump"),
        s.method.apply_to(config.raw_output)
    );
    println!();
}

pub fn print_output_summary(config: &PipelineConfig, output: &PipelineOutput) {
    let s = Styles::new();

    println!();
    if let Some(ref source) = output.source {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Source"),
            s.path.apply_to(source.path.display())
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Size"),
            s.value.apply_to(format!(
                "{}x{} ({} bands, {}-bit)",
                source.width, source.height, source.bands, source.bit_depth
            ))
        );
    }
    if let Some(stats) = NdviStats::compute(&output.ndvi.view()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("NDVI"),
            s.value.apply_to(format!(
                "min {:.3}  max {:.3}  mean {:.3}",
                stats.min, stats.max, stats.mean
            ))
        );
    }

    let total = output.labels.len().max(1) as f64;
    for (label, count) in class_histogram(&output.labels.view()) {
        println!(
            "  {:<14}{}",
            s.label.apply_to(format!("Class {label}")),
            s.value.apply_to(format!(
                "{count} px ({:.1}%)",
                count as f64 / total * 100.0
            ))
        );
    }
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Raster"),
        s.path.apply_to(config.output.display())
    );
    if config.raw_output.labels() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Labels"),
            s.path.apply_to(config.labels_raw_path().display())
        );
    }
    if config.raw_output.ndvi() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("NDVI array"),
            s.path.apply_to(config.ndvi_raw_path().display())
        );
    }
}
