mod input;
mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sortify_core::{
    Algorithm, RunController, RunOutcome, RunStatus, VisualizerConfig, DEFAULT_EXPORT_FILE,
};
use tracing_subscriber::EnvFilter;

use crate::{
    input::KeyControls,
    render::{TerminalRenderer, ToneTrace},
};

fn main() -> sortify_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            list_algorithms();
            Ok(())
        }
        Commands::Run(args) => run(args),
    }
}

fn list_algorithms() {
    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        println!(
            "{:<10} {:<16} time {:<18} space {:<8} {}",
            algorithm.id(),
            info.name,
            info.time_complexity,
            info.space_complexity,
            info.description
        );
    }
}

fn run(args: RunArgs) -> sortify_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => VisualizerConfig::load(path)?,
        None => VisualizerConfig::default(),
    };
    if args.seed.is_some() {
        config.generation.seed = args.seed;
    }
    if args.headless {
        config.pacing.animate = false;
    }
    let speed = args.speed.unwrap_or(config.pacing.default_speed);

    let controller = RunController::new(config);
    match args.values {
        Some(values) => controller.load(values)?,
        None => {
            let size = args.size.unwrap_or(controller.config().generation.size);
            controller.generate(size)?;
        }
    }

    if !args.quiet {
        controller.subscribe(Box::new(TerminalRenderer::stdout()))?;
    }
    controller.subscribe(Box::new(ToneTrace))?;

    let controls = if args.headless {
        None
    } else {
        KeyControls::spawn(controller.controls())?
    };
    if controls.is_some() {
        eprintln!("{}\r", input::HELP);
    }

    tracing::info!(algorithm = %args.algorithm, speed, "starting run");
    let outcome = controller.start_run(&args.algorithm, speed);
    drop(controls);
    let outcome = outcome?;
    print_summary(&outcome);

    if let Some(path) = &args.export {
        export(&controller, path)?;
    }
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let status = match &outcome.status {
        RunStatus::Completed => "completed".to_string(),
        RunStatus::Cancelled => "cancelled".to_string(),
        RunStatus::Failed(reason) => format!("failed: {reason}"),
    };
    println!(
        "{} {status}: {} comparisons, {} swaps, {} writes in {} ms",
        outcome.algorithm.info().name,
        outcome.metrics.comparisons,
        outcome.metrics.swaps,
        outcome.metrics.writes,
        outcome.elapsed_ms
    );
}

fn export(controller: &RunController, path: &Path) -> sortify_core::Result<()> {
    controller.export_snapshot()?.write_json(path)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step sorting algorithm visualizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available algorithms with their complexities.
    List,
    /// Sort a sequence with one algorithm, drawing every step.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Algorithm identifier, e.g. `bubble` or `quick`.
    algorithm: String,
    /// Number of random values to generate.
    #[arg(short = 'n', long)]
    size: Option<usize>,
    /// Speed multiplier; larger is faster.
    #[arg(short, long)]
    speed: Option<f64>,
    /// Seed for the value generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Explicit comma-separated values instead of a random sequence.
    #[arg(long, value_delimiter = ',')]
    values: Option<Vec<u32>>,
    /// Skip the step delay entirely.
    #[arg(long)]
    headless: bool,
    /// Do not draw the sequence.
    #[arg(short, long)]
    quiet: bool,
    /// Write the run snapshot as JSON.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
    export: Option<PathBuf>,
    /// JSON configuration file for pacing and generation.
    #[arg(short, long)]
    config: Option<PathBuf>,
}
