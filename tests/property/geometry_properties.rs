// Property-based tests for time grid geometry

use proptest::prelude::*;

use coach_calendar::ui_egui::TimeGrid;

fn slot_sizes() -> impl Strategy<Value = u32> {
    prop_oneof![Just(5u32), Just(10), Just(15), Just(30), Just(60)]
}

proptest! {
    /// Property: snapping an already-snapped position changes nothing
    #[test]
    fn prop_snap_is_idempotent(
        pixels in 0.0f32..2000.0,
        hour_height in prop_oneof![Just(40.0f32), Just(60.0), Just(80.0), Just(120.0)],
        slot in slot_sizes(),
    ) {
        let grid = TimeGrid::new(hour_height, slot);
        let snapped = grid.offset_to_minutes(pixels);
        prop_assert_eq!(grid.offset_to_minutes(grid.minutes_to_offset(snapped)), snapped);
    }

    /// Property: snapped minutes are whole slots
    #[test]
    fn prop_snap_lands_on_slot_boundary(pixels in -500.0f32..2500.0, slot in slot_sizes()) {
        let grid = TimeGrid::new(80.0, slot);
        prop_assert_eq!(grid.offset_to_minutes(pixels) % slot as i64, 0);
    }

    /// Property: pointer mapping always leaves room for one slot before
    /// midnight
    #[test]
    fn prop_pointer_minutes_within_day(
        pointer_y in -1000.0f32..5000.0,
        column_top in 0.0f32..300.0,
        scroll in 0.0f32..1500.0,
    ) {
        let grid = TimeGrid::new(80.0, 15);
        let minutes = grid.pointer_to_minutes(pointer_y, column_top, scroll);
        prop_assert!((0..=1425).contains(&minutes));
    }

    /// Property: blocks never shrink below the minimum visual height
    #[test]
    fn prop_block_span_respects_min_height(start in 0i64..1440, length in 0i64..600) {
        let grid = TimeGrid::new(80.0, 15);
        let (top, height) = grid.block_span(start, start + length, 30.0);
        prop_assert!(height >= 30.0);
        prop_assert!(top >= 0.0);
    }
}
