use std::time::Duration;

use livechart::ChartError;
use livechart::core::{SeriesInput, SeriesStore, WindowCursor};

const PERIOD: Duration = Duration::from_millis(2);

fn ramp_store(len: usize) -> SeriesStore {
    let x: Vec<f64> = (0..len).map(|i| i as f64).collect();
    let doubled: Vec<f64> = x.iter().map(|v| v * 2.0).collect();
    SeriesStore::new("x", x, vec![SeriesInput::new("a", doubled)]).expect("valid store")
}

#[test]
fn attach_prefills_the_window() {
    let store = ramp_store(10);
    let cursor = WindowCursor::new(&store, 4, PERIOD).expect("cursor");

    assert_eq!(cursor.end(), 3);
    assert_eq!(cursor.labels(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(cursor.row(0), Some(vec![0.0, 2.0, 4.0, 6.0]));
}

#[test]
fn capacity_must_fit_the_store() {
    let store = ramp_store(3);
    assert!(matches!(
        WindowCursor::new(&store, 4, PERIOD),
        Err(ChartError::InvalidCapacity {
            requested: 4,
            len: 3
        })
    ));
    assert!(matches!(
        WindowCursor::new(&store, 0, PERIOD),
        Err(ChartError::InvalidCapacity { .. })
    ));
}

#[test]
fn tick_drops_oldest_and_appends_newest() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 3, PERIOD).expect("cursor");
    let token = cursor.start();

    let delta = cursor.advance(&store, token).expect("tick");
    assert_eq!(delta.append_label, 3.0);
    assert_eq!(delta.append_values.as_slice(), &[6.0]);

    assert_eq!(cursor.end(), 3);
    assert_eq!(cursor.labels(), vec![1.0, 2.0, 3.0]);
    assert_eq!(cursor.row(0), Some(vec![2.0, 4.0, 6.0]));
}

#[test]
fn cursor_wraps_past_the_last_index() {
    let store = ramp_store(4);
    let mut cursor = WindowCursor::new(&store, 2, PERIOD).expect("cursor");
    let token = cursor.start();

    // end: 1 -> 2 -> 3 -> 0 (wrap, not 4)
    cursor.advance(&store, token).expect("tick");
    cursor.advance(&store, token).expect("tick");
    assert_eq!(cursor.end(), 3);

    let delta = cursor.advance(&store, token).expect("wrapping tick");
    assert_eq!(cursor.end(), 0);
    assert_eq!(delta.append_label, 0.0);
    assert_eq!(cursor.labels(), vec![3.0, 0.0]);
}

#[test]
fn window_always_holds_exactly_capacity_points() {
    let store = ramp_store(5);
    let mut cursor = WindowCursor::new(&store, 3, PERIOD).expect("cursor");
    let token = cursor.start();

    for _ in 0..12 {
        cursor.advance(&store, token).expect("tick");
        assert!(cursor.end() < store.len());
        assert_eq!(cursor.labels().len(), 3);
        assert_eq!(cursor.row(0).map(|r| r.len()), Some(3));
    }
}

#[test]
fn stopped_cursor_never_ticks() {
    let store = ramp_store(6);
    let mut cursor = WindowCursor::new(&store, 2, PERIOD).expect("cursor");
    let token = cursor.start();

    cursor.stop();
    // Idempotent: a second stop is a no-op, not an error.
    cursor.stop();

    assert!(cursor.advance(&store, token).is_none());
    assert!(!cursor.is_running());
    assert_eq!(cursor.end(), 1);
}

#[test]
fn double_start_keeps_a_single_schedule() {
    let store = ramp_store(6);
    let mut cursor = WindowCursor::new(&store, 2, PERIOD).expect("cursor");

    let first = cursor.start();
    let second = cursor.start();
    assert_eq!(first, second);

    // Both handles drive the same schedule; one tick per callback.
    cursor.advance(&store, first).expect("tick");
    assert_eq!(cursor.end(), 2);
}

#[test]
fn queued_tick_is_dropped_after_stop() {
    let store = ramp_store(6);
    let mut cursor = WindowCursor::new(&store, 2, PERIOD).expect("cursor");
    let queued = cursor.start();

    cursor.stop();
    let resumed = cursor.start();

    // The token captured before the stop must not advance the cursor even
    // though the cursor is running again.
    assert!(cursor.advance(&store, queued).is_none());
    assert!(cursor.advance(&store, resumed).is_some());
}

#[test]
fn set_period_swaps_the_schedule_atomically() {
    let store = ramp_store(6);
    let mut cursor = WindowCursor::new(&store, 2, PERIOD).expect("cursor");
    let old = cursor.start();

    let new = cursor.set_period(Duration::from_millis(50));
    assert_eq!(new.period, Duration::from_millis(50));
    assert_eq!(cursor.period(), Duration::from_millis(50));

    // No stale-cadence tick, no double-firing: old schedule is dead.
    assert!(cursor.advance(&store, old).is_none());
    assert!(cursor.advance(&store, new).is_some());
}

#[test]
fn jump_recenters_on_the_rounded_match() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 4, PERIOD).expect("cursor");
    cursor.start();

    cursor.jump_to_x(&store, 6.8).expect("jump to 7");
    // index 7 + capacity/2 = 9; window is the 4 samples ending there.
    assert_eq!(cursor.end(), 9);
    assert_eq!(cursor.labels(), vec![6.0, 7.0, 8.0, 9.0]);
    assert!(!cursor.is_running());
}

#[test]
fn jump_clamps_near_the_dataset_start() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 6, PERIOD).expect("cursor");

    cursor.jump_to_x(&store, 0.0).expect("jump to 0");
    // index 0 + 3 = 3, clamped up to capacity - 1 = 5.
    assert_eq!(cursor.end(), 5);
    assert_eq!(cursor.labels(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn jump_miss_leaves_the_window_untouched() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 4, PERIOD).expect("cursor");
    let before_labels = cursor.labels();
    let before_end = cursor.end();

    let err = cursor.jump_to_x(&store, 42.0).unwrap_err();
    assert!(matches!(err, ChartError::ValueNotFound(target) if target == 42.0));
    assert_eq!(cursor.labels(), before_labels);
    assert_eq!(cursor.end(), before_end);
}

#[test]
fn jump_invalidates_the_running_schedule() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 4, PERIOD).expect("cursor");
    let token = cursor.start();

    cursor.jump_to_x(&store, 5.0).expect("jump");
    assert!(cursor.advance(&store, token).is_none());
}

#[test]
fn resize_rebuilds_at_the_current_cursor() {
    let store = ramp_store(10);
    let mut cursor = WindowCursor::new(&store, 4, PERIOD).expect("cursor");
    let token = cursor.start();
    cursor.advance(&store, token).expect("tick");
    assert_eq!(cursor.end(), 4);

    cursor.set_capacity(&store, 2).expect("shrink");
    assert_eq!(cursor.end(), 4);
    assert_eq!(cursor.labels(), vec![3.0, 4.0]);

    cursor.set_capacity(&store, 5).expect("grow");
    assert_eq!(cursor.labels(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    let err = cursor.set_capacity(&store, 11).unwrap_err();
    assert!(matches!(err, ChartError::InvalidCapacity { .. }));
}

#[test]
fn rebuild_after_wrap_reads_cyclically() {
    let store = ramp_store(4);
    let mut cursor = WindowCursor::new(&store, 3, PERIOD).expect("cursor");
    let token = cursor.start();

    // Advance twice: end 2 -> 3 -> 0.
    cursor.advance(&store, token).expect("tick");
    cursor.advance(&store, token).expect("tick");
    assert_eq!(cursor.end(), 0);

    cursor.set_capacity(&store, 3).expect("same-size rebuild");
    assert_eq!(cursor.labels(), vec![2.0, 3.0, 0.0]);
}
