use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traverse_core::batch::{self, BatchReport, DayOutcome};
use traverse_core::config::PipelineConfig;
use traverse_core::layers::{self, VectorLayerSink};

/// Mobile-traverse merge pipeline: aligns per-day logger and GPS track files
/// onto a uniform timeline and exports merged CSV tables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge each day's logger and GPS files into aligned CSV tables.
    Merge(MergeArgs),
    /// Emit a vector-layer manifest for previously merged CSV files.
    Layers(LayersArgs),
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// TOML configuration file; the flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root holding one directory per field day.
    #[arg(long)]
    days_root: Option<PathBuf>,

    /// Output directory for merged CSV files.
    #[arg(long)]
    merged_dir: Option<PathBuf>,

    /// Direction sub-label under each day's GPS folder.
    #[arg(long)]
    direction: Option<String>,

    /// Ambient station series (.csv or .zip) sliced per day.
    #[arg(long)]
    ambient: Option<PathBuf>,

    /// GPS device clock offset from UTC in hours (UTC = local - offset).
    #[arg(long)]
    utc_offset_hours: Option<i64>,

    /// Bucket width GPS fixes are averaged onto, in seconds.
    #[arg(long)]
    gps_resample_seconds: Option<i64>,

    /// Step of the merged uniform timeline, in seconds.
    #[arg(long)]
    grid_step_seconds: Option<i64>,
}

#[derive(Args, Debug)]
struct LayersArgs {
    /// Directory holding merged per-day CSV files.
    #[arg(long, default_value = "Merged")]
    merged_dir: PathBuf,

    /// Where to write the layer manifest.
    #[arg(long, default_value = "Merged/layers.json")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Merge(args) => run_merge(args),
        Command::Layers(args) => run_layers(args),
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(days_root) = args.days_root {
        config.days_root = days_root;
    }
    if let Some(merged_dir) = args.merged_dir {
        config.merged_dir = merged_dir;
    }
    if args.direction.is_some() {
        config.direction = args.direction;
    }
    if args.ambient.is_some() {
        config.ambient = args.ambient;
    }
    if let Some(hours) = args.utc_offset_hours {
        config.utc_offset_hours = hours;
    }
    if let Some(seconds) = args.gps_resample_seconds {
        config.gps_resample_seconds = seconds;
    }
    if let Some(seconds) = args.grid_step_seconds {
        config.grid_step_seconds = seconds;
    }

    let report = batch::run(&config)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec!["Day", "Outcome", "Rows", "Output"]);
    for day in &report.days {
        match &day.outcome {
            DayOutcome::Merged { rows, path, ambient_rows } => {
                let outcome = match ambient_rows {
                    Some(count) => format!("merged (+{count} ambient rows)"),
                    None => "merged".to_string(),
                };
                table.add_row(vec![
                    day.day.clone(),
                    outcome,
                    rows.to_string(),
                    path.display().to_string(),
                ]);
            }
            DayOutcome::Skipped { reason } => {
                table.add_row(vec![
                    day.day.clone(),
                    "skipped".to_string(),
                    String::new(),
                    reason.clone(),
                ]);
            }
        }
    }
    println!("{table}");
    println!(
        "{} merged, {} skipped",
        report.merged_count(),
        report.skipped_count()
    );
}

fn run_layers(args: LayersArgs) -> Result<()> {
    let specs = layers::merged_layer_specs(&args.merged_dir)?;
    let mut manifest = layers::LayerManifest::default();
    for spec in &specs {
        manifest.add_layer(spec)?;
    }
    manifest.write_json(&args.out)?;
    info!(count = specs.len(), path = %args.out.display(), "wrote layer manifest");
    println!("wrote {} layers to {}", specs.len(), args.out.display());
    Ok(())
}
