//! Player event types and the broadcast bus that carries them
//!
//! Playback runs fire-and-forget relative to the HTTP caller that queued a
//! track, so per-track outcomes (including failures) are only observable here
//! and in the logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// Playback worker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Worker waiting, nothing playing
    Idle,
    /// Worker streaming tracks to the device
    Playing,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

/// Events emitted by the playback controller and its worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A track was appended to the queue
    TrackEnqueued {
        /// Path of the enqueued file
        path: String,
        /// Queue length after the append
        queue_len: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Player moved from Idle to Playing
    PlaybackStarted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Worker opened a track and began streaming it
    TrackStarted {
        path: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Track played to the end of its stream
    TrackFinished {
        path: String,
        /// Frames written to the device
        frames: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Track aborted early by a skip request
    TrackSkipped {
        path: String,
        /// Frames written before the skip was observed
        frames: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Track could not be decoded or written to the device
    TrackFailed {
        path: String,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Queue drained, player back to Idle
    QueueFinished {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Event name used for SSE `event:` lines
    pub fn event_type(&self) -> &str {
        match self {
            PlayerEvent::TrackEnqueued { .. } => "TrackEnqueued",
            PlayerEvent::PlaybackStarted { .. } => "PlaybackStarted",
            PlayerEvent::TrackStarted { .. } => "TrackStarted",
            PlayerEvent::TrackFinished { .. } => "TrackFinished",
            PlayerEvent::TrackSkipped { .. } => "TrackSkipped",
            PlayerEvent::TrackFailed { .. } => "TrackFailed",
            PlayerEvent::QueueFinished { .. } => "QueueFinished",
        }
    }

    /// Track path carried by the event, if any
    pub fn track_path(&self) -> Option<&str> {
        match self {
            PlayerEvent::TrackEnqueued { path, .. }
            | PlayerEvent::TrackStarted { path, .. }
            | PlayerEvent::TrackFinished { path, .. }
            | PlayerEvent::TrackSkipped { path, .. }
            | PlayerEvent::TrackFailed { path, .. } => Some(path),
            PlayerEvent::PlaybackStarted { .. } | PlayerEvent::QueueFinished { .. } => None,
        }
    }
}

/// One-to-many broadcast of [`PlayerEvent`]s
///
/// Slow subscribers lag and lose the oldest events rather than blocking the
/// playback worker.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use voxq_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PlayerEvent,
    ) -> Result<usize, broadcast::error::SendError<PlayerEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
