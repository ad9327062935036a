//! Group run metrics by strategy and mobility condition.

use super::schema::{RunMetrics, StrategyResult};
use log::debug;

/// Concatenate run metrics per (mobility, strategy)
///
/// **Public** - final stage of the pipeline
///
/// Groups appear in the order their first run appears, and inside a group
/// every value list is the concatenation of its runs in input order. No
/// value is recomputed.
///
/// # Arguments
/// * `runs` - Run metrics in configuration order
///
/// # Returns
/// One `StrategyResult` per distinct (mobility, strategy) pair
pub fn assemble(runs: &[RunMetrics]) -> Vec<StrategyResult> {
    let mut groups: Vec<StrategyResult> = Vec::new();

    for run in runs {
        let index = match groups
            .iter()
            .position(|group| group.mobility == run.mobility && group.strategy == run.strategy)
        {
            Some(index) => index,
            None => {
                groups.push(StrategyResult::new(run.mobility, run.strategy));
                groups.len() - 1
            }
        };

        append_run(&mut groups[index], run);
    }

    debug!("Assembled {} runs into {} groups", runs.len(), groups.len());
    groups
}

/// **Private** - concatenation of one run into its group
fn append_run(group: &mut StrategyResult, run: &RunMetrics) {
    group.configurations.push(run.label.clone());
    group.per.extend(run.per());
    group.latency.extend(run.latency());
    group.throughput_mbps.extend(run.throughput());
    group.slice_throughput_mbps.extend(run.slice_throughput());
    group.spectral_efficiency.extend(run.spectral_efficiency());
    group.tx_power_dbm.extend(run.tx_power());
}
