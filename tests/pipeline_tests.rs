use pretty_assertions::assert_eq;
use proptest::prelude::*;
use slice_trace_metrics::aggregator::{aggregate, derive_per, PacketRule};
use slice_trace_metrics::batch::{load_batch, run_batch};
use slice_trace_metrics::classifier::presets::single_channel;
use slice_trace_metrics::classifier::{
    BandwidthSource, FrameLayout, OffsetSet, PowerSource, Slice, SliceAssignment, SliceRange,
    StationShape, Strategy as AllocationStrategy,
};
use slice_trace_metrics::parser::{parse_trace, read_trace, read_trace_set, TraceSet};
use slice_trace_metrics::utils::error::{AggregationError, FormatError, PipelineError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER_ROWS: usize = 5;

fn header(scenarios: u64, seeds: u64) -> String {
    format!(
        "scenarios,{}\nseeds per scenario,{}\nnotes,synthetic\narg_list[0],--seed=1\narg_list[1],--seed=2\n",
        scenarios, seeds
    )
}

fn station(tx: u64, rx: u64, latency: f64) -> String {
    format!("sta,0,0,{},{},{}\n", tx, rx, latency)
}

/// Period 10, slice A at offsets 1-2, the rest split between B and C
fn period_ten_layout() -> FrameLayout {
    FrameLayout {
        name: "period-10".to_string(),
        strategy: AllocationStrategy::SingleChannel,
        period: 10,
        position_base: 0,
        assignment: SliceAssignment {
            slice_a: OffsetSet::new(vec![SliceRange::new(1, 2)]),
            slice_b: OffsetSet::new(vec![SliceRange::new(3, 6)]),
            slice_c: OffsetSet::new(vec![SliceRange::new(7, 0)]),
        },
        ignored: OffsetSet::default(),
        bandwidth: BandwidthSource::Fixed { mhz: 160.0 },
        tx_power: PowerSource::default(),
    }
}

/// 40 rows: offsets 1-2 deliver everything, the others lose half
fn period_ten_trace() -> String {
    let mut text = header(2, 4);
    for position in 1..=40u64 {
        let offset = position % 10;
        if offset == 1 || offset == 2 {
            text.push_str(&station(10, 10, 4.0));
        } else {
            text.push_str(&station(10, 5, 8.0));
        }
    }
    text
}

fn parse(text: &str) -> TraceSet {
    parse_trace(Path::new("synthetic.csv"), text.as_bytes(), HEADER_ROWS)
        .unwrap()
        .into()
}

#[test]
fn test_end_to_end_period_ten() {
    let layout = period_ten_layout();
    assert!(layout.validate().is_ok());

    let set = parse(&period_ten_trace());
    assert_eq!(set.header.scenario_count, 2);
    assert_eq!(set.header.seed_count, 4);
    assert_eq!(set.len(), 40);

    let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap();

    assert_eq!(accs.len(), 4);
    for acc in &accs {
        assert_eq!(acc.rows, 2);
        assert_eq!(acc.tx_packets, 20.0);
        assert_eq!(acc.rx_packets, 20.0);
        assert_eq!(derive_per(acc), vec![0.0, 0.0]);
        assert_eq!(acc.latency_samples, vec![4.0, 4.0]);
    }
}

#[test]
fn test_other_slices_see_losses() {
    let layout = period_ten_layout();
    let set = parse(&period_ten_trace());

    let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::B)).unwrap();
    assert_eq!(accs[0].rows, 4);
    assert_eq!(derive_per(&accs[0]), vec![0.5; 4]);
}

#[test]
fn test_uneven_split_is_an_error() {
    let layout = period_ten_layout();
    let mut text = period_ten_trace();
    // Position 41 is offset 1 of a fifth frame: a ninth slice A row
    text.push_str(&station(10, 10, 4.0));

    let set = parse(&text);
    let err = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Aggregation(AggregationError::UnevenSeedBlocks { rows: 9, seeds: 4 })
    ));
}

#[test]
fn test_invalid_seed_count() {
    let text = "scenarios,1\nseeds per scenario,zero\nx\ny\nz\n";
    let err = parse_trace(Path::new("bad.csv"), text.as_bytes(), HEADER_ROWS).unwrap_err();
    assert!(matches!(err, FormatError::InvalidHeaderValue { row: 2, .. }));
}

#[test]
fn test_non_numeric_selected_row_names_position_and_column() {
    let layout = period_ten_layout();
    let text = format!("{}sta,0,0,10,10,4\nsta,0,0,ten,10,4\n", header(1, 1));
    let set = parse(&text);

    let err = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap_err();
    match err {
        PipelineError::Format(FormatError::InvalidField {
            path,
            position,
            column,
            value,
        }) => {
            assert_eq!(path, PathBuf::from("synthetic.csv"));
            assert_eq!(position, 2);
            assert_eq!(column, 3);
            assert_eq!(value, "ten");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_file_set_sums_seeds_and_restarts_positions() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let body = [station(10, 9, 1.0), station(10, 8, 2.0), station(10, 7, 3.0)].concat();
    fs::write(&first, format!("{}{}", header(1, 1), body)).unwrap();
    fs::write(&second, format!("{}{}{}", header(1, 2), body, body)).unwrap();

    let set = read_trace_set(&[first.clone(), second], HEADER_ROWS).unwrap();
    assert_eq!(set.header.seed_count, 3);
    assert_eq!(set.traces[1].rows[0].position, 1);

    let layout = single_channel(StationShape::new(1, 1, 1)).unwrap();
    let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap();
    assert_eq!(accs.len(), 3);
    assert!(accs.iter().all(|acc| acc.rx_packets == 9.0));

    assert_eq!(read_trace(&first, HEADER_ROWS).unwrap().len(), 3);
}

#[test]
fn test_file_set_scenario_mismatch() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    fs::write(&first, header(1, 1)).unwrap();
    fs::write(&second, header(2, 1)).unwrap();

    let err = read_trace_set(&[first, second], HEADER_ROWS).unwrap_err();
    assert!(matches!(
        err,
        FormatError::ScenarioMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

fn write_batch(dir: &Path) -> PathBuf {
    fs::write(dir.join("period10.csv"), period_ten_trace()).unwrap();

    let batch = r#"
slice = "A"

[[run]]
label = "synthetic"
strategy = "single_channel"
layout = "period-10"
files = ["period10.csv"]

[[layout]]
name = "period-10"
strategy = "single_channel"
period = 10
slice_a = [[1, 2]]
slice_b = [[3, 6]]
slice_c = [[7, 0]]
bandwidth = { kind = "fixed", mhz = 160.0 }
"#;
    let path = dir.join("batch.toml");
    fs::write(&path, batch).unwrap();
    path
}

#[test]
fn test_batch_end_to_end() {
    let dir = TempDir::new().unwrap();
    let batch = load_batch(write_batch(dir.path())).unwrap();

    let report = run_batch(&batch).unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.configurations, vec!["synthetic".to_string()]);
    assert_eq!(group.per, vec![0.0; 8]);
    assert_eq!(group.throughput_mbps.len(), 4);
    assert_eq!(group.tx_power_dbm, vec![20.0; 4]);

    // Network throughput: 2 * 10 + 8 * 5 packets per seed
    let expected = 60.0 * 1472.0 * 8.0 / (15.0 * 1e6);
    for (throughput, efficiency) in group.throughput_mbps.iter().zip(&group.spectral_efficiency) {
        assert!((throughput - expected).abs() < 1e-12);
        assert!((efficiency - expected / 160.0).abs() < 1e-12);
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let batch = load_batch(write_batch(dir.path())).unwrap();

    let first = run_batch(&batch).unwrap();
    let second = run_batch(&batch).unwrap();

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.runs, second.runs);
}

#[test]
fn test_missing_file_withholds_batch() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(dir.path());
    fs::remove_file(dir.path().join("period10.csv")).unwrap();

    let batch = load_batch(path).unwrap();
    let err = run_batch(&batch).unwrap_err();
    assert!(matches!(err, PipelineError::Format(FormatError::Io { .. })));
}

proptest! {
    #[test]
    fn aggregation_conserves_packets(
        seeds in 1u64..6,
        frames_per_seed in 1usize..4,
        tx in prop::collection::vec(1u64..1_000, 1..200),
    ) {
        let layout = single_channel(StationShape::new(1, 1, 1)).unwrap();
        let rows = seeds as usize * frames_per_seed * 3;

        let mut text = header(1, seeds);
        let mut expected_tx = 0u64;
        for position in 1..=rows {
            let value = tx[position % tx.len()];
            if position % 3 == 1 {
                expected_tx += value;
            }
            text.push_str(&station(value, value / 2, 1.0));
        }

        let set = parse(&text);
        let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap();

        prop_assert_eq!(accs.len(), seeds as usize);
        prop_assert!(accs.iter().all(|acc| acc.rows == frames_per_seed));
        let total: f64 = accs.iter().map(|acc| acc.tx_packets).sum();
        prop_assert_eq!(total, expected_tx as f64);
    }
}
