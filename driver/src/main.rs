use clap::Parser;
use generator::profile::{write_synthetic_recording, GeneratorConfig};
use powerwin_render::OutputFormat;
use std::path::PathBuf;
use workflow::config::{Overrides, PipelineConfig};
use workflow::runner::{Invocation, Runner};

mod generator;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Chart mean power between the two boundary markers of a recording"
)]
struct Args {
    /// Recordings to plot; each needs a sibling `.anno.jls` annotation file
    #[arg(required = true)]
    data_files: Vec<PathBuf>,
    /// Output name (default: derived from the first data file's path)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,
    /// Also open the chart in a browser
    #[arg(short = 's', long, default_value_t = false)]
    show: bool,
    /// Legend label per series: data files first, then overlays
    #[arg(short = 'l', long = "label", num_args = 1..)]
    labels: Vec<String>,
    /// Target number of buckets per series
    #[arg(short = 'c', long)]
    resolution: Option<usize>,
    /// Reference recording overlaid on the chart
    #[arg(short = 'a', long = "add")]
    overlays: Vec<PathBuf>,
    /// Mark the first recording's text annotations on the chart
    #[arg(short = 't', long, default_value_t = false)]
    text_markers: bool,
    /// Load a pipeline config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write a JSON summary of the chart next to it
    #[arg(long, default_value_t = false)]
    summary: bool,
    /// Generate a synthetic recording at every data path first
    #[arg(long, default_value_t = false)]
    synthesize: bool,
    /// Lay the chart out and print its structure without writing it
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base = if let Some(path) = args.config.as_ref() {
        PipelineConfig::load(path)?
    } else {
        PipelineConfig::default()
    };
    let config = base.with_overrides(&Overrides {
        resolution: args.resolution,
        text_markers: args.text_markers,
        summary: args.summary,
        output_dir: args.out_dir.clone(),
        format: args.format,
    });

    if args.synthesize {
        for (index, path) in args.data_files.iter().chain(&args.overlays).enumerate() {
            let generator = GeneratorConfig {
                seed: index as u64,
                ..Default::default()
            };
            write_synthetic_recording(path, &generator)?;
            println!("Synthesized {}", path.display());
        }
    }

    let runner = Runner::new(config);
    let invocation = Invocation {
        data_files: args.data_files,
        overlays: args.overlays,
        labels: args.labels,
        output_name: args.output,
        show: args.show,
    };

    if args.dry_run {
        let planned = runner.plan(&invocation)?;
        println!("{}", serde_json::to_string_pretty(&planned)?);
        return Ok(());
    }

    let report = runner.execute(&invocation)?;

    let summary = &report.summary;
    println!(
        "Chart -> {} ({} points x {} series, {} markers, t in {})",
        summary.path.display(),
        summary.point_count,
        summary.series_count,
        summary.marker_count,
        summary.unit.symbol()
    );
    println!("Buckets per series: {:?}", report.resolutions);
    if let Some(path) = report.summary_path {
        println!("Summary -> {}", path.display());
    }

    Ok(())
}
