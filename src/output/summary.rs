//! Terminal rendering of an analysis report.
//!
//! One block per (strategy, mobility) group with distribution summaries of
//! every metric, followed by a per-run table.

use crate::aggregator::Distribution;
use crate::assembly::{Report, StrategyResult};
use colored::*;

const RULE: &str = "---------------------------------------------------";

/// Render a human-readable summary of a report for the terminal
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    for group in &report.groups {
        out.push_str(&render_group(group));
    }
    out.push_str(&render_runs(report));

    out
}

fn render_header(report: &Report) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("Slice {} Metrics", report.slice).bold().to_string());
    out.push_str(&format!("\n{}\n", RULE));
    out.push_str(&format!(
        "Packet size: {} B | Duration: {} s | Runs: {}\n",
        report.constants.packet_size_bytes,
        report.constants.simulation_time_s,
        report.runs.len()
    ));
    out.push_str(&format!("{}\n", RULE));
    out
}

fn render_group(group: &StrategyResult) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&group.title().cyan().bold().to_string());
    out.push('\n');
    out.push_str(&format!("  Configurations: {}\n", group.configurations.join(", ")));

    let metrics: [(&str, &[f64]); 5] = [
        ("PER", &group.per),
        ("Latency", &group.latency),
        ("Throughput (Mbps)", &group.throughput_mbps),
        ("Spectral eff.", &group.spectral_efficiency),
        ("Tx power (dBm)", &group.tx_power_dbm),
    ];

    for (name, values) in metrics {
        let dist = Distribution::from_samples(values);
        if dist.count == 0 {
            out.push_str(&format!("  {:<18} {}\n", name, "no samples".dimmed()));
        } else {
            out.push_str(&format!("  {:<18} {}\n", name, dist.summary()));
        }
    }

    out
}

fn render_runs(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", RULE));

    for run in &report.runs {
        let throughput = Distribution::from_samples(&run.throughput().collect::<Vec<_>>());
        let status = if run.seeds.iter().all(|seed| seed.rows > 0) {
            "✓".green()
        } else {
            "!".yellow()
        };

        out.push_str(&format!(
            "{} {:<10} {:<16} {:<11} seeds {:>3} | mean throughput {:.2} Mbps\n",
            status,
            run.label,
            run.strategy.label(),
            if run.mobility { "mobility" } else { "no mobility" },
            run.seeds.len(),
            throughput.mean
        ));
    }

    out
}
