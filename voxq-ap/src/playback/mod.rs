//! Playback queue, worker and controller

pub mod controller;
pub mod queue;
mod worker;

pub use controller::{PlaybackController, PlaybackOptions, DEFAULT_CHUNK_FRAMES};
pub use queue::{PlayOutcome, PlaybackQueue, QueueSnapshot, SkipSignal, Track};
