use proptest::prelude::*;
use slice_trace_metrics::classifier::presets::{
    dynamic_slicing, layout_for, single_channel, static_slicing,
};
use slice_trace_metrics::classifier::{
    classify, Classification, LayoutTable, OffsetSet, SliceAssignment, SliceRange, StationShape,
    Strategy as AllocationStrategy,
};
use slice_trace_metrics::utils::config::REFERENCE_SHAPES;

fn range_strategy() -> impl Strategy<Value = SliceRange> {
    (0u64..64, 0u64..64).prop_map(|(start, end)| SliceRange::new(start, end))
}

fn assignment_strategy() -> impl Strategy<Value = SliceAssignment> {
    (
        prop::collection::vec(range_strategy(), 0..3),
        prop::collection::vec(range_strategy(), 0..3),
        prop::collection::vec(range_strategy(), 0..3),
    )
        .prop_map(|(a, b, c)| SliceAssignment {
            slice_a: OffsetSet::new(a),
            slice_b: OffsetSet::new(b),
            slice_c: OffsetSet::new(c),
        })
}

proptest! {
    #[test]
    fn classify_is_periodic(
        position in -1_000_000i64..1_000_000,
        period in 1u64..64,
        base in -10i64..10,
        assignment in assignment_strategy(),
    ) {
        let here = classify(position, period, base, &assignment);
        let next = classify(position + period as i64, period, base, &assignment);
        prop_assert_eq!(here, next);
    }

    #[test]
    fn classify_is_total(
        position in any::<i64>(),
        period in 0u64..1_000,
        base in any::<i64>(),
        assignment in assignment_strategy(),
    ) {
        // Never panics, whatever the inputs
        let _ = classify(position, period, base, &assignment);
    }

    #[test]
    fn reference_layouts_classify_consistently(
        shape_index in 0usize..3,
        position in 1u64..100_000,
    ) {
        let shape = StationShape::from(REFERENCE_SHAPES[shape_index]);
        for strategy in [
            AllocationStrategy::SingleChannel,
            AllocationStrategy::Static,
            AllocationStrategy::Dynamic,
        ] {
            let layout = layout_for(strategy, shape).unwrap();
            prop_assert_eq!(layout.classify(position), layout.classify(position + layout.period));
        }
    }
}

#[test]
fn test_reference_layouts_partition() {
    let table = LayoutTable::reference().unwrap();
    assert_eq!(table.len(), 9);

    for layout in table.iter() {
        assert!(layout.validate().is_ok(), "{} must validate", layout.name);
    }
}

#[test]
fn test_reference_ranges_match_literal_tables() {
    // 4-100-4
    let single = single_channel(StationShape::new(4, 100, 4)).unwrap();
    assert_eq!(single.period, 108);
    assert_eq!(single.assignment.slice_a.ranges(), &[SliceRange::new(1, 4)]);
    assert_eq!(single.assignment.slice_b.ranges(), &[SliceRange::new(5, 104)]);
    assert_eq!(single.assignment.slice_c.ranges(), &[SliceRange::new(105, 0)]);

    let stat = static_slicing(StationShape::new(2, 100, 6)).unwrap();
    assert_eq!(stat.assignment.slice_a.ranges(), &[SliceRange::new(3, 4)]);
    assert_eq!(stat.assignment.slice_b.ranges(), &[SliceRange::new(5, 104)]);
    assert_eq!(stat.assignment.slice_c.ranges(), &[SliceRange::new(105, 0)]);

    let dynamic = dynamic_slicing(StationShape::new(6, 100, 2)).unwrap();
    assert_eq!(dynamic.period, 1684);
    assert_eq!(dynamic.assignment.slice_a.ranges(), &[SliceRange::new(1576, 1581)]);
    assert_eq!(dynamic.assignment.slice_b.ranges(), &[SliceRange::new(1582, 1681)]);
    assert_eq!(dynamic.assignment.slice_c.ranges(), &[SliceRange::new(1682, 1683)]);
}

#[test]
fn test_static_marker_rows_are_discarded() {
    let layout = static_slicing(StationShape::new(2, 100, 6)).unwrap();

    // Heading and channel-width rows of every run
    assert_eq!(layout.classify(1), Classification::Discard);
    assert_eq!(layout.classify(2), Classification::Discard);
    assert_eq!(layout.classify(111), Classification::Discard);
    assert_eq!(layout.classify(112), Classification::Discard);
    assert_eq!(layout.classify(110), Classification::SliceC);
    assert_eq!(layout.classify(113), Classification::SliceA);
}

#[test]
fn test_strategy_keys() {
    assert_eq!(AllocationStrategy::SingleChannel.key(), "single");
    assert_eq!(AllocationStrategy::Dynamic.to_string(), "Dynamic slicing");
}
