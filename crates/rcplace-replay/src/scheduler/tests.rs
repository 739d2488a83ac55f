//! Tests for the replay scheduler

use super::*;
use crate::client::MockTileClient;
use crate::command::Tile;
use crate::error::{DispatchError, Field, SkipReason};
use crate::mock::{aof_record as record, RecordingTileClient};
use std::time::Duration;

fn tile(x: u16, y: u16, color: &'static str) -> Tile {
    Tile { x, y, color }
}

#[tokio::test(start_paused = true)]
async fn test_dispatches_in_order_with_pacing() {
    let client = RecordingTileClient::new();
    let pace = Duration::from_millis(250);
    let scheduler = ReplayScheduler::new(
        Arc::new(client.clone()),
        ReplayOptions::default().with_pace(pace),
    );

    let log = format!("{}{}", record("#0", "0"), record("#101", "15"));
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(
        client.tiles(),
        vec![tile(0, 0, "black"), tile(1, 1, "white")]
    );
    let times = client.call_times();
    assert!(times[1] - times[0] >= pace);

    assert_eq!(report.records, 2);
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 0);
    assert!(report.is_clean());
    assert!(report.finished_at.is_some());
    assert_eq!(report.last_applied, Some(tile(1, 1, "white")));
}

#[tokio::test(start_paused = true)]
async fn test_truncated_record_is_counted_and_skipped() {
    let client = RecordingTileClient::new();
    let scheduler = ReplayScheduler::new(Arc::new(client.clone()), ReplayOptions::default());

    let truncated = "SET\r\n$2\r\nu4\r\n$3\r\n#12\r\n";
    let log = format!("{}{}{}", record("#1", "1"), truncated, record("#2", "2"));
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(client.tiles(), vec![tile(1, 0, "forest"), tile(2, 0, "green")]);
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skipped_records[0].sequence, 2);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_records_are_rejected() {
    let client = RecordingTileClient::new();
    let scheduler = ReplayScheduler::new(Arc::new(client.clone()), ReplayOptions::default());

    let log = format!(
        "{}{}{}",
        record("#10000", "1"),
        record("#5", "16"),
        record("#9999", "15")
    );
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(client.tiles(), vec![tile(99, 99, "white")]);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.rejected(), 2);
    assert!(matches!(
        &report.skipped_records[1].reason,
        SkipReason::Rejected(err) if err.field == Field::Color && err.value == 16
    ));
}

#[tokio::test(start_paused = true)]
async fn test_all_malformed_completes_without_error() {
    let client = RecordingTileClient::new();
    let scheduler = ReplayScheduler::new(Arc::new(client.clone()), ReplayOptions::default());

    let log = format!(
        "{}{}SET\r\n",
        record("#x", "1"),
        record("#1", "blue")
    );
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert!(client.tiles().is_empty());
    assert_eq!(report.applied, 0);
    assert_eq!(report.skipped, 3);
    assert_eq!(report.records, 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_dispatch_does_not_stop_replay() {
    let client = RecordingTileClient::new();
    client.push_outcome(Some(DispatchError::Rejected {
        status: 403,
        message: "forbidden".to_string(),
    }));
    client.push_outcome(None);

    let pace = Duration::from_millis(100);
    let scheduler = ReplayScheduler::new(
        Arc::new(client.clone()),
        ReplayOptions::default().with_pace(pace),
    );

    let log = format!("{}{}", record("#3", "4"), record("#4", "4"));
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.applied, 1);
    assert_eq!(client.tiles().len(), 2);

    // The pause applies after the failed attempt too.
    let times = client.call_times();
    assert!(times[1] - times[0] >= pace);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_canvas_with_mock() {
    let mut mock = MockTileClient::new();
    mock.expect_set_tile()
        .times(2)
        .returning(|_| Err(DispatchError::Unreachable("connection refused".to_string())));

    let scheduler = ReplayScheduler::new(Arc::new(mock), ReplayOptions::default());
    let log = format!("{}{}", record("#0", "0"), record("#1", "0"));
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(report.applied, 0);
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_dry_run_never_calls_client() {
    let mut mock = MockTileClient::new();
    mock.expect_set_tile().never();

    let scheduler = ReplayScheduler::new(Arc::new(mock), ReplayOptions::dry_run());
    let log = format!("{}{}", record("#0", "0"), record("#1", "0"));
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.applied, 2);
    assert!(report.last_applied.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_range_filters_accepted_commands() {
    let client = RecordingTileClient::new();
    let scheduler = ReplayScheduler::new(
        Arc::new(client.clone()),
        ReplayOptions::default().with_range(Some(2), Some(3)),
    );

    let log = format!(
        "{}{}{}{}{}",
        record("#0", "0"),
        record("#bad", "0"),
        record("#1", "1"),
        record("#2", "2"),
        record("#3", "3")
    );
    let report = scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(client.tiles(), vec![tile(1, 0, "forest"), tile(2, 0, "green")]);
    assert_eq!(report.filtered, 2);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_later_writes_follow_earlier_ones() {
    let client = RecordingTileClient::new();
    let scheduler = ReplayScheduler::new(
        Arc::new(client.clone()),
        ReplayOptions::default().with_pace(Duration::ZERO),
    );

    let log = format!("{}{}", record("#42", "8"), record("#42", "11"));
    scheduler.run(log.as_bytes()).await.unwrap();

    assert_eq!(client.tiles(), vec![tile(42, 0, "red"), tile(42, 0, "yellow")]);
}

#[tokio::test]
async fn test_missing_file_is_source_error() {
    let scheduler = ReplayScheduler::new(
        Arc::new(RecordingTileClient::new()),
        ReplayOptions::default(),
    );
    let err = scheduler
        .run_path(Path::new("/nonexistent/appendonly.aof"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(err.to_string().contains("appendonly.aof"));
}

#[test]
fn test_options_range() {
    let opts = ReplayOptions::default().with_range(Some(2), None);
    assert!(!opts.includes(1));
    assert!(opts.includes(2));
    assert!(opts.includes(1_000));

    let opts = ReplayOptions::dry_run().with_range(None, Some(5));
    assert!(opts.dry_run);
    assert!(opts.includes(5));
    assert!(!opts.includes(6));
    assert_eq!(opts.pace, DEFAULT_PACE);
}

#[tokio::test]
async fn test_report_serializes() {
    let scheduler = ReplayScheduler::new(
        Arc::new(RecordingTileClient::new()),
        ReplayOptions::dry_run(),
    );
    let report = scheduler.run(record("#z", "1").as_bytes()).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["skipped"], 1);
    assert_eq!(json["skipped_records"][0]["sequence"], 1);
    assert_eq!(json["skipped_records"][0]["reason"]["kind"], "malformed_integer");
}
