//! # voxq Audio Player Library (voxq-ap)
//!
//! Text-to-speech HTTP service with a serialized playback queue.
//!
//! **Purpose:** Synthesize speech through a remote provider, queue the
//! resulting files, and play them one at a time on a local output device while
//! HTTP handlers keep enqueueing, starting and skipping concurrently.
//!
//! **Architecture:** One playback worker thread owns the device
//! (symphonia decode, cpal output); everything else talks to it through
//! [`playback::PlaybackController`].

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod tts;

pub use error::{Error, Result};
pub use playback::{PlayOutcome, PlaybackController, PlaybackOptions};
