use crate::batch::load_batch;
use crate::classifier::{BandwidthSource, FrameLayout, LayoutTable, PowerSource, Slice};
use crate::output::{read_report, render_summary};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a batch file and every layout it uses
pub fn validate_batch_file(file_path: &Path) -> Result<()> {
    println!("Validating batch: {}", file_path.display());

    let batch = load_batch(file_path)
        .with_context(|| format!("Invalid batch {}", file_path.display()))?;

    println!("✓ Valid batch");
    println!("  Slice: {}", batch.config.slice);
    println!("  Runs: {}", batch.config.runs.len());
    println!("  Custom layouts: {}", batch.config.layouts.len());

    for run in &batch.config.runs {
        let missing: Vec<_> = run.files.iter().filter(|file| !file.is_file()).collect();
        let layout = batch.layout_for(run)?;
        println!(
            "  {} {} [{}] -> {} (period {}), {} files",
            if missing.is_empty() { "✓" } else { "!" },
            run.label,
            run.strategy,
            layout.name,
            layout.period,
            run.files.len()
        );
        for file in missing {
            println!("      missing: {}", file.display());
        }
    }

    Ok(())
}

/// Print the summary of a previously written report
pub fn inspect_report(file_path: &Path) -> Result<()> {
    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    println!("Report: {}", file_path.display());
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    if report.version != SCHEMA_VERSION {
        println!(
            "  Note: written with schema v{}, this build reads v{}",
            report.version, SCHEMA_VERSION
        );
    }
    println!("{}", render_summary(&report));

    Ok(())
}

/// Display the built-in layouts
pub fn display_layouts(show_details: bool) -> Result<()> {
    let table = LayoutTable::reference()?;

    println!("Built-in layouts ({})", table.len());
    println!();

    for layout in table.iter() {
        println!(
            "  {:<20} {:<16} period {:>5}, base {}",
            layout.name,
            layout.strategy.label(),
            layout.period,
            layout.position_base
        );
        if show_details {
            print_layout_details(layout);
        }
    }

    if !show_details {
        println!();
        println!("Use --show for slice ranges and marker rows");
    }

    Ok(())
}

fn print_layout_details(layout: &FrameLayout) {
    for slice in Slice::ALL {
        println!(
            "      slice {}: {} ({} rows per frame)",
            slice,
            layout.assignment.get(slice),
            layout.rows_per_frame(slice)
        );
    }
    if !layout.ignored.is_empty() {
        println!("      ignored: {}", layout.ignored);
    }

    match &layout.bandwidth {
        BandwidthSource::Fixed { mhz } => println!("      bandwidth: fixed {} MHz", mhz),
        BandwidthSource::Markers { rows, columns } => println!(
            "      bandwidth: {} marker ranges, columns {:?}",
            rows.ranges().len(),
            columns
        ),
    }

    match &layout.tx_power {
        PowerSource::Fixed { dbm } => println!("      tx power: fixed {} dBm", dbm),
        PowerSource::Markers { column, .. } => {
            println!("      tx power: marker rows, column {}", column)
        }
    }
}

/// Display version information
pub fn display_version() {
    println!("Slice Trace Metrics v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-slice PER, latency, throughput and spectral efficiency");
    println!("from Wi-Fi slicing simulation traces.");
}
