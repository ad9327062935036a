//! Slice Trace Metrics CLI
//!
//! Derives per-slice packet-error rate, latency, throughput and spectral
//! efficiency from the CSV traces of Wi-Fi slicing simulations.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use slice_trace_metrics::classifier::Slice;
use slice_trace_metrics::commands::{
    display_layouts, display_version, execute_analyze, inspect_report, validate_args,
    validate_batch_file, AnalyzeArgs,
};

/// Slice Trace Metrics - per-slice metrics from simulation traces
#[derive(Parser, Debug)]
#[command(name = "slice-metrics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every run of a batch file
    Analyze {
        /// TOML batch file
        #[arg(short, long, env = "SLICE_METRICS_BATCH")]
        batch: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also export the assembled values as long-format CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Slice to analyze (A, B or C), overrides the batch file
        #[arg(long)]
        slice: Option<Slice>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a batch file and its layouts
    Validate {
        /// Path to the TOML batch file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the summary of a written report
    Inspect {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the built-in layouts
    Layouts {
        /// Show slice ranges and marker rows
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            batch,
            output,
            csv,
            slice,
            summary,
        } => {
            let args = AnalyzeArgs {
                batch,
                output_json: output,
                output_csv: csv,
                slice,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_batch_file(&file)?;
        }

        Commands::Inspect { file } => {
            inspect_report(&file)?;
        }

        Commands::Layouts { show } => {
            display_layouts(show)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
