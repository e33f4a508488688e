use std::time::Duration;

use foresight_cache::{LoadReport, MetricsRecorder};
use foresight_core::config::MetricsConfig;

#[test]
fn aggregates_finalized_durations() {
    let recorder = MetricsRecorder::default();
    recorder.record("a", Duration::from_millis(100));
    recorder.record("b", Duration::from_millis(200));
    recorder.record("c", Duration::from_millis(300));

    let stats = recorder.stats();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.average_duration, Duration::from_millis(200));
    assert_eq!(stats.min_duration, Duration::from_millis(100));
    assert_eq!(stats.max_duration, Duration::from_millis(300));

    assert_eq!(
        recorder.report(),
        LoadReport {
            total_loaded: 3,
            average_load_time_ms: 200.0,
            fastest_load_ms: 100.0,
            slowest_load_ms: 300.0,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn start_and_end_measure_elapsed_time() {
    let recorder = MetricsRecorder::default();
    for (key, ms) in [("a", 100u64), ("b", 200), ("c", 300)] {
        let load = recorder.start(key);
        tokio::time::sleep(Duration::from_millis(ms)).await;
        let elapsed = recorder.end(load).unwrap();
        assert!(elapsed >= Duration::from_millis(ms));
        assert!(elapsed < Duration::from_millis(ms + 5));
    }

    let stats = recorder.stats();
    assert_eq!(stats.count, 3);
    assert!(stats.min_duration >= Duration::from_millis(100));
    assert!(stats.max_duration >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn overlapping_loads_of_one_key_are_timed_separately() {
    let recorder = MetricsRecorder::default();
    let slow = recorder.start("charts");
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = recorder.start("charts");
    assert_eq!(recorder.pending_count(), 2);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast_elapsed = recorder.end(fast).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let slow_elapsed = recorder.end(slow).unwrap();

    assert!(fast_elapsed >= Duration::from_millis(100) && fast_elapsed < Duration::from_millis(110));
    assert!(slow_elapsed >= Duration::from_millis(300) && slow_elapsed < Duration::from_millis(310));

    let stats = recorder.stats();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.min_duration, fast_elapsed);
    assert_eq!(stats.max_duration, slow_elapsed);
    assert_eq!(recorder.pending_count(), 0);
}

#[test]
fn pending_loads_are_not_aggregated() {
    let recorder = MetricsRecorder::default();
    let _load = recorder.start("slow");
    assert_eq!(recorder.pending_count(), 1);
    assert_eq!(recorder.stats().count, 0);
}

#[test]
fn capacity_comes_from_config() {
    let recorder = MetricsRecorder::new(&MetricsConfig {
        history_capacity: 3,
    });
    for i in 0..10 {
        recorder.record(&format!("k{i}"), Duration::from_millis(i));
    }
    assert_eq!(recorder.capacity(), 3);
    assert_eq!(recorder.stats().count, 3);
    assert_eq!(recorder.stats().min_duration, Duration::from_millis(7));

    recorder.reset();
    assert_eq!(recorder.stats().count, 0);
}
