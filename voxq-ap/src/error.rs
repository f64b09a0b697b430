//! Error types for voxq-ap
//!
//! Queue-state errors (`NotFound`, `EmptyQueue`, `NothingToSkip`, `ShutDown`)
//! are returned synchronously to the caller of the controller operation.
//! `Decode` and `AudioOutput` only ever occur inside the playback worker and
//! are reported through logs and `TrackFailed` events.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for voxq-ap
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Enqueue target does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Play requested with nothing queued
    #[error("Playback queue is empty")]
    EmptyQueue,

    /// Skip requested while the player is idle
    #[error("Nothing to skip, player is idle")]
    NothingToSkip,

    /// Play requested after the player was shut down
    #[error("Player is shut down")]
    ShutDown,

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// Remote speech synthesis errors
    #[error("TTS error: {0}")]
    Tts(String),

    /// WAV read/write errors
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<voxq_common::Error> for Error {
    fn from(err: voxq_common::Error) -> Self {
        match err {
            voxq_common::Error::Io(e) => Error::Io(e),
            voxq_common::Error::Config(msg) => Error::Config(msg),
            voxq_common::Error::NotFound(msg) => Error::NotFound(PathBuf::from(msg)),
            voxq_common::Error::InvalidInput(msg) => Error::InvalidInput(msg),
        }
    }
}

/// Convenience Result type using voxq-ap Error
pub type Result<T> = std::result::Result<T, Error>;
