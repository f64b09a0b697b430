//! Playback worker
//!
//! One dedicated thread owns the audio device and is the only consumer of the
//! [`PlaybackQueue`]. Each track is decoded in fixed-size chunks and the skip
//! signal is checked at every chunk boundary.

use crate::audio::{AudioSink, StreamGuard, TrackReader};
use crate::error::Result;
use crate::playback::queue::{PlaybackQueue, Track};
use chrono::Utc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};
use voxq_common::{EventBus, PlayerEvent};

/// How one track ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackOutcome {
    /// Stream exhausted and drained
    Completed { frames: u64 },
    /// Skip signal observed
    Skipped { frames: u64 },
    /// Shutdown observed mid-track
    Stopped { frames: u64 },
}

pub(crate) struct PlaybackWorker {
    queue: Arc<PlaybackQueue>,
    sink: Arc<dyn AudioSink>,
    events: EventBus,
    chunk_frames: usize,
}

impl PlaybackWorker {
    pub(crate) fn new(
        queue: Arc<PlaybackQueue>,
        sink: Arc<dyn AudioSink>,
        events: EventBus,
        chunk_frames: usize,
    ) -> Self {
        Self {
            queue,
            sink,
            events,
            chunk_frames: chunk_frames.max(1),
        }
    }

    /// Start the worker thread
    pub(crate) fn spawn(self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("voxq-playback".to_string())
            .spawn(move || self.run())?;
        Ok(handle)
    }

    fn run(self) {
        info!("Playback worker started (sink: {})", self.sink.name());

        while let Some(track) = self.queue.next_track() {
            info!("Playing {}", track);
            self.events.emit_lossy(PlayerEvent::TrackStarted {
                path: track.to_string(),
                timestamp: Utc::now(),
            });

            match self.play_track(&track) {
                Ok(TrackOutcome::Completed { frames }) => {
                    info!("Finished {} ({} frames)", track, frames);
                    self.events.emit_lossy(PlayerEvent::TrackFinished {
                        path: track.to_string(),
                        frames,
                        timestamp: Utc::now(),
                    });
                }
                Ok(TrackOutcome::Skipped { frames }) => {
                    info!("Skipped {} after {} frames", track, frames);
                    self.events.emit_lossy(PlayerEvent::TrackSkipped {
                        path: track.to_string(),
                        frames,
                        timestamp: Utc::now(),
                    });
                }
                Ok(TrackOutcome::Stopped { frames }) => {
                    info!("Stopped {} after {} frames, shutting down", track, frames);
                }
                Err(e) => {
                    error!("Failed to play {}: {}", track, e);
                    self.events.emit_lossy(PlayerEvent::TrackFailed {
                        path: track.to_string(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }

            if self.queue.finish_track() {
                info!("Queue finished, player idle");
                self.events.emit_lossy(PlayerEvent::QueueFinished {
                    timestamp: Utc::now(),
                });
            }
        }

        info!("Playback worker stopped");
    }

    /// Stream one track to the sink
    ///
    /// The device stream is closed by the guard on every return path.
    fn play_track(&self, track: &Track) -> Result<TrackOutcome> {
        let mut reader = TrackReader::open(track.path())?;
        let format = reader.format();
        let mut stream = StreamGuard::new(self.sink.open(format)?);

        debug!("Streaming {} at {} in {}-frame chunks", track, format, self.chunk_frames);

        let channels = format.channels as usize;
        let mut frames: u64 = 0;

        while let Some(chunk) = reader.next_chunk(self.chunk_frames)? {
            if self.queue.is_shut_down() {
                return Ok(TrackOutcome::Stopped { frames });
            }
            if self.queue.skip_signal().take() {
                return Ok(TrackOutcome::Skipped { frames });
            }

            stream.write(&chunk)?;
            frames += (chunk.len() / channels) as u64;
        }

        stream.drain()?;
        Ok(TrackOutcome::Completed { frames })
    }
}
