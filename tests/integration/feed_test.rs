//! Integration tests for the JSON-lines bar feed

use speedometer::alert::LogSink;
use speedometer::config::SpeedometerConfig;
use speedometer::feed::{BarFeed, JsonlBarFeed};
use speedometer::indicator::{run, Speedometer};
use std::io::Write;

fn write_bars(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_jsonl_feed_streams_in_order() {
    let file = write_bars(&[
        r#"{"sequence_index":0,"timestamp":"2024-03-01T14:30:00Z"}"#,
        r#"{"sequence_index":1,"timestamp":"2024-03-01T14:30:03Z"}"#,
        r#"{"sequence_index":2,"timestamp":"2024-03-01T14:30:06Z"}"#,
    ]);

    let feed = JsonlBarFeed::new(file.path());
    let mut rx = feed.subscribe().await.unwrap();

    let mut indices = Vec::new();
    while let Some(bar) = rx.recv().await {
        indices.push(bar.sequence_index);
    }
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_jsonl_feed_skips_bad_lines() {
    let file = write_bars(&[
        "# exported bars",
        r#"{"sequence_index":0,"timestamp":"2024-03-01T14:30:00Z","close":5100.25}"#,
        "",
        "garbage",
        r#"{"sequence_index":1}"#,
        r#"{"sequence_index":2,"timestamp":"2024-03-01T14:30:06Z"}"#,
    ]);

    let feed = JsonlBarFeed::with_capacity(file.path(), 1);
    let mut rx = feed.subscribe().await.unwrap();

    let mut indices = Vec::new();
    while let Some(bar) = rx.recv().await {
        indices.push(bar.sequence_index);
    }
    assert_eq!(indices, vec![0, 2]);
}

#[tokio::test]
async fn test_replay_file_through_speedometer() {
    // 3s apart for 3 bars (speed 40 at period 2), then 6s apart (speed 20),
    // then 2s apart (speed 60)
    let file = write_bars(&[
        r#"{"sequence_index":0,"timestamp":"2024-03-01T14:30:00Z"}"#,
        r#"{"sequence_index":1,"timestamp":"2024-03-01T14:30:03Z"}"#,
        r#"{"sequence_index":2,"timestamp":"2024-03-01T14:30:06Z"}"#,
        r#"{"sequence_index":3,"timestamp":"2024-03-01T14:30:12Z"}"#,
        r#"{"sequence_index":4,"timestamp":"2024-03-01T14:30:18Z"}"#,
        r#"{"sequence_index":5,"timestamp":"2024-03-01T14:30:20Z"}"#,
        r#"{"sequence_index":6,"timestamp":"2024-03-01T14:30:22Z"}"#,
    ]);

    let config = SpeedometerConfig {
        period: 2,
        min_threshold: 30.0,
        alert_cooldown_bars: 1,
        alerts_enabled: true,
        ..Default::default()
    };
    let mut speedometer = Speedometer::configure(config).unwrap().start();
    let rx = JsonlBarFeed::new(file.path()).subscribe().await.unwrap();

    let mut speeds = Vec::new();
    let summary = run(&mut speedometer, rx, &LogSink, |_, update| {
        speeds.extend(update.sample.map(|s| s.value));
    })
    .await;

    // spans: 6s, 9s, 12s, 8s, 4s
    assert_eq!(speeds, vec![40.0, 27.0, 20.0, 30.0, 60.0]);
    assert_eq!(summary.bars, 7);
    assert_eq!(summary.samples, 5);
    // 20 -> 30 is the only upward crossing
    assert_eq!(summary.alerts, 1);
    assert_eq!(summary.last_speed, Some(60.0));
}

#[test]
fn test_missing_file_is_error() {
    let feed = JsonlBarFeed::new("/nonexistent/bars.jsonl");
    let result = tokio_test::block_on(feed.subscribe());
    assert!(result.is_err());
}
