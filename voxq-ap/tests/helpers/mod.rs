//! Shared helpers for voxq-ap integration tests
//!
//! - Deterministic WAV generation
//! - A recording in-memory `AudioSink`
//! - Waiting on player events with a timeout

#![allow(dead_code)]

pub mod audio_generator;
pub mod recording_sink;

pub use audio_generator::{
    generate_silent_wav, generate_test_track, generate_tone_frames, write_corrupt_file,
    TEST_SAMPLE_RATE,
};
pub use recording_sink::{RecordingSink, StreamRecord};

use std::time::Duration;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tokio::time::timeout;
use voxq_common::PlayerEvent;

/// Upper bound on how long any single test waits for the worker
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Receive events until one matches `pred`
///
/// Panics if nothing matches within [`EVENT_TIMEOUT`].
pub async fn wait_for_event<F>(rx: &mut Receiver<PlayerEvent>, mut pred: F) -> PlayerEvent
where
    F: FnMut(&PlayerEvent) -> bool,
{
    timeout(EVENT_TIMEOUT, async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for player event")
}

/// Collect events up to and including the first `QueueFinished`
pub async fn collect_until_queue_finished(rx: &mut Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    loop {
        let event = wait_for_event(rx, |_| true).await;
        let done = matches!(event, PlayerEvent::QueueFinished { .. });
        events.push(event);
        if done {
            return events;
        }
    }
}

/// Poll `cond` every 10 ms until it holds or the timeout passes
pub async fn eventually<F: FnMut() -> bool>(mut cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
