//! The analyze command: batch file in, report out.

use super::models::AnalyzeArgs;
use crate::batch::{load_batch, run_batch};
use crate::output::{render_summary, write_csv, write_report};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// Ok if every run was analyzed and the outputs were written
///
/// # Errors
/// * Batch loading or layout validation failures
/// * Trace format and aggregation errors (no partial report is written)
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     batch: PathBuf::from("batch.toml"),
///     output_json: PathBuf::from("report.json"),
///     ..Default::default()
/// };
///
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading batch {}...", args.batch.display());
    let mut batch = load_batch(&args.batch)
        .with_context(|| format!("Failed to load batch {}", args.batch.display()))?;

    if let Some(slice) = args.slice {
        info!("Slice overridden on the command line: {}", slice);
        batch.config.slice = slice;
    }

    info!(
        "Step 2/3: Analyzing {} runs for slice {}...",
        batch.config.runs.len(),
        batch.config.slice
    );
    let report = run_batch(&batch).context("Batch analysis failed")?;

    info!("Step 3/3: Writing output files...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if let Some(csv_path) = &args.output_csv {
        write_csv(&report, csv_path).context("Failed to write report CSV")?;
        info!("✓ CSV written to: {}", csv_path.display());
    }

    if args.print_summary {
        println!("{}", render_summary(&report));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.batch.as_os_str().is_empty() {
        anyhow::bail!("Batch file path cannot be empty");
    }

    if !args.batch.is_file() {
        anyhow::bail!("Batch file not found: {}", args.batch.display());
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Report path cannot be empty");
    }

    if args.output_csv.as_ref() == Some(&args.output_json) {
        anyhow::bail!("CSV and JSON outputs must be different files");
    }

    Ok(())
}
