//! Event bus delivery tests
//!
//! Fan-out to several subscribers, lag behaviour for slow subscribers and
//! the JSON shape SSE clients receive.

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use voxq_common::{EventBus, PlayerEvent};

fn finished(path: &str) -> PlayerEvent {
    PlayerEvent::TrackFinished {
        path: path.to_string(),
        frames: 1024,
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn test_every_subscriber_sees_every_event() {
    let bus = EventBus::new(16);
    let mut first = bus.subscribe();
    let mut second = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    assert_eq!(bus.emit(finished("a.wav")).unwrap(), 2);
    bus.emit_lossy(finished("b.wav"));

    for rx in [&mut first, &mut second] {
        assert_eq!(rx.recv().await.unwrap().track_path(), Some("a.wav"));
        assert_eq!(rx.recv().await.unwrap().track_path(), Some("b.wav"));
    }
}

#[tokio::test]
async fn test_subscriber_only_sees_later_events() {
    let bus = EventBus::new(16);
    let _keep_open = bus.subscribe();
    bus.emit_lossy(finished("before.wav"));

    let mut late = bus.subscribe();
    bus.emit_lossy(finished("after.wav"));

    assert_eq!(late.recv().await.unwrap().track_path(), Some("after.wav"));
}

#[test]
fn test_emit_without_subscribers() {
    let bus = EventBus::new(4);
    assert!(bus.emit(finished("a.wav")).is_err());

    // Lossy emission never fails
    bus.emit_lossy(finished("a.wav"));
}

#[tokio::test]
async fn test_slow_subscriber_lags_instead_of_blocking() {
    let bus = EventBus::new(2);
    let mut rx = bus.subscribe();

    for i in 0..5 {
        bus.emit_lossy(finished(&format!("{}.wav", i)));
    }

    match rx.recv().await {
        Err(RecvError::Lagged(missed)) => assert_eq!(missed, 3),
        other => panic!("expected lag, got {:?}", other),
    }
    assert_eq!(rx.recv().await.unwrap().track_path(), Some("3.wav"));
    assert_eq!(rx.recv().await.unwrap().track_path(), Some("4.wav"));
}

#[test]
fn test_event_json_is_tagged_by_type() {
    let event = finished("audio_outputs/a.wav");
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["type"], event.event_type());
    assert_eq!(value["path"], "audio_outputs/a.wav");
    assert_eq!(value["frames"], 1024);
}
