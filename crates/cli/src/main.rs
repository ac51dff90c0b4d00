//! CLI entry point for the wind-tunnel data reduction pipeline.
//!
//! Loads balance exports, reduces them and reports a summary per run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunnel_core::{Config, RunId};
use tunnel_ingestion::{load_dataset, RecordSetReader};
use tunnel_reduction::{DatasetReducer, RunSummary};

#[derive(Parser)]
#[command(name = "tunnel-reduce")]
#[command(about = "Reduce wind-tunnel force-balance exports", long_about = None)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce all five runs from a data directory
    Reduce {
        /// Directory holding the run exports
        #[arg(value_name = "DATA_DIR", default_value = "Data")]
        data_dir: PathBuf,

        /// Summary output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Reduce a single export as the given run
    ReduceRun {
        /// Run identity (flat-plate-angle, flat-plate-velocity, half-sphere, inverted-cup, sphere)
        #[arg(short, long)]
        run: String,

        /// Export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Summary output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn render(summaries: &[RunSummary], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(summaries)?),
        Format::Text => Ok(summaries.iter().map(format_summary).collect::<Vec<_>>().join("\n")),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{:<20} n={:<6} {} [{} .. {}]  CL mean={} sd={} missing={}  CD mean={} sd={} missing={}  |PM|max={}",
        summary.run.as_str(),
        summary.samples,
        summary.abscissa_kind.label(),
        opt(summary.abscissa_min),
        opt(summary.abscissa_max),
        opt(summary.lift.mean),
        opt(summary.lift.std_dev),
        summary.lift.missing,
        opt(summary.drag.mean),
        opt(summary.drag.std_dev),
        summary.drag.missing,
        opt(summary.peak_moment),
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "Effective configuration");

    match cli.command {
        Commands::Reduce { data_dir, format } => {
            let dataset = load_dataset(&data_dir, &config.ingestion)
                .with_context(|| format!("loading dataset from {}", data_dir.display()))?;
            let reducer = DatasetReducer::new(&config)?;
            let reduced = reducer.reduce(&dataset)?;
            info!(runs = reduced.records().len(), "Reduction complete");

            let summaries: Vec<RunSummary> =
                reduced.records().iter().map(RunSummary::from_record).collect();
            println!("{}", render(&summaries, format)?);
        }
        Commands::ReduceRun { run, file, format } => {
            let run: RunId = run.parse()?;
            let raw = RecordSetReader::new(&config.ingestion)?
                .read_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let record = DatasetReducer::new(&config)?.reduce_run(run, &raw)?;
            println!("{}", render(&[RunSummary::from_record(&record)], format)?);
        }
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
