//! Public face of the playback subsystem
//!
//! [`PlaybackController`] is built once at startup and shared with the HTTP
//! layer. Its operations only append to the queue or raise signals; they never
//! touch the audio device and never wait for playback.

use crate::audio::AudioSink;
use crate::error::{Error, Result};
use crate::playback::queue::{PlayOutcome, PlaybackQueue, QueueSnapshot, Track};
use crate::playback::worker::PlaybackWorker;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use tokio::sync::broadcast;
use tracing::{debug, info};
use voxq_common::{EventBus, PlaybackState, PlayerEvent};

/// Default frames per device write
pub const DEFAULT_CHUNK_FRAMES: usize = 1024;

/// Tunables for [`PlaybackController::start`]
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    /// Frames decoded and written per chunk; bounds skip latency
    pub chunk_frames: usize,
    /// Player event channel capacity
    pub event_capacity: usize,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            event_capacity: 100,
        }
    }
}

pub struct PlaybackController {
    queue: Arc<PlaybackQueue>,
    sink: Arc<dyn AudioSink>,
    events: EventBus,
    worker: Mutex<Option<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl PlaybackController {
    /// Create the queue and spawn the playback worker
    pub fn start(sink: Arc<dyn AudioSink>, options: PlaybackOptions) -> Result<Self> {
        let queue = Arc::new(PlaybackQueue::new());
        let events = EventBus::new(options.event_capacity);

        let handle = PlaybackWorker::new(
            Arc::clone(&queue),
            Arc::clone(&sink),
            events.clone(),
            options.chunk_frames,
        )
        .spawn()?;

        info!(
            "Playback controller started (sink: {}, chunk: {} frames)",
            sink.name(),
            options.chunk_frames
        );

        Ok(Self {
            queue,
            sink,
            events,
            worker: Mutex::new(Some(handle)),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Append a file to the tail of the queue.
    ///
    /// Returns the queue length after the append. Does not start playback.
    ///
    /// # Errors
    /// `NotFound` if the path does not exist; the queue is left unchanged.
    pub fn enqueue(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let track = Track::new(path);
        let queue_len = self.queue.push(track);
        debug!("Enqueued {} (queue length {})", path.display(), queue_len);

        self.events.emit_lossy(PlayerEvent::TrackEnqueued {
            path: path.display().to_string(),
            queue_len,
            timestamp: Utc::now(),
        });
        Ok(queue_len)
    }

    /// Start draining the queue
    ///
    /// # Errors
    /// - `EmptyQueue` if the player is idle with nothing queued
    /// - `ShutDown` once [`PlaybackController::shutdown`] has run
    pub fn play(&self) -> Result<PlayOutcome> {
        let (outcome, queued) = self.queue.request_play()?;
        match outcome {
            PlayOutcome::Started => {
                info!("Playback started ({} queued)", queued);
                self.events.emit_lossy(PlayerEvent::PlaybackStarted {
                    timestamp: Utc::now(),
                });
            }
            PlayOutcome::AlreadyPlaying => debug!("Play requested while already playing"),
        }
        Ok(outcome)
    }

    /// Abort the current track and move on to the next one
    ///
    /// # Errors
    /// `NothingToSkip` if the player is idle.
    pub fn skip(&self) -> Result<()> {
        self.queue.request_skip()?;
        info!("Skip requested");
        Ok(())
    }

    /// Release the audio device and tell the worker to exit.
    ///
    /// Safe to call more than once and from any thread. The worker is not
    /// joined; see [`PlaybackController::worker_finished`].
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Shutting down playback");
        self.sink.shutdown();
        self.queue.shutdown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// True once the worker thread has exited
    pub fn worker_finished(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    pub fn state(&self) -> PlaybackState {
        self.queue.state()
    }

    pub fn is_playing(&self) -> bool {
        self.queue.state().is_playing()
    }

    /// Track the worker is streaming, if any
    pub fn current_track(&self) -> Option<PathBuf> {
        self.queue.current().map(|t| t.path().to_path_buf())
    }

    /// Pending tracks in play order, excluding the current one
    pub fn queued_tracks(&self) -> Vec<PathBuf> {
        self.snapshot()
            .pending
            .iter()
            .map(|t| t.path().to_path_buf())
            .collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.queue.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
