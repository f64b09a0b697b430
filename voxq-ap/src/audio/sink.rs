//! Output device abstraction consumed by the playback worker
//!
//! The worker only ever sees these traits, so any backend offering
//! open / write / close can drive playback. PCM crosses this boundary as
//! interleaved `f32` in [-1.0, 1.0]; converting to the device's native sample
//! format is the backend's job.

use crate::error::Result;
use std::fmt;

/// Format a stream is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    /// Frames per second
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
}

impl StreamFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Number of interleaved samples in `frames` frames
    pub fn samples_for(&self, frames: usize) -> usize {
        frames * self.channels as usize
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz/{}ch", self.sample_rate, self.channels)
    }
}

/// An output device that can open one stream per track
///
/// Shared between the worker (which opens streams) and the controller (which
/// shuts the device down), hence `Send + Sync`.
pub trait AudioSink: Send + Sync {
    /// Open an output stream for the given format
    ///
    /// Fails once [`AudioSink::shutdown`] has been called.
    fn open(&self, format: StreamFormat) -> Result<Box<dyn AudioStream>>;

    /// Release the device
    ///
    /// After this returns, open streams stop producing output and every further
    /// `open` or `write` fails. Must be idempotent.
    fn shutdown(&self);

    /// Human-readable backend name for logs
    fn name(&self) -> String;
}

/// A stream opened on an [`AudioSink`]
///
/// Streams are created and dropped on the playback worker thread, so they are
/// not required to be `Send` (cpal streams are not).
pub trait AudioStream {
    /// Write interleaved samples, blocking while the device applies backpressure
    fn write(&mut self, samples: &[f32]) -> Result<()>;

    /// Wait until samples already written have been played
    fn drain(&mut self) -> Result<()> {
        Ok(())
    }

    /// Stop the stream and release its device resources. Idempotent.
    fn close(&mut self);
}

/// Closes the wrapped stream when dropped, on every exit path
pub struct StreamGuard {
    stream: Box<dyn AudioStream>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn AudioStream>) -> Self {
        Self { stream }
    }

    pub fn write(&mut self, samples: &[f32]) -> Result<()> {
        self.stream.write(samples)
    }

    pub fn drain(&mut self) -> Result<()> {
        self.stream.drain()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.stream.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingStream {
        closes: Arc<AtomicUsize>,
    }

    impl AudioStream for CountingStream {
        fn write(&mut self, _samples: &[f32]) -> Result<()> {
            Err(crate::Error::AudioOutput("device unplugged".to_string()))
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_guard_closes_on_error_path() {
        let closes = Arc::new(AtomicUsize::new(0));

        let result = (|| -> Result<()> {
            let mut guard = StreamGuard::new(Box::new(CountingStream {
                closes: Arc::clone(&closes),
            }));
            guard.write(&[0.0, 0.0])?;
            Ok(())
        })();

        assert!(result.is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stream_format() {
        let format = StreamFormat::new(22050, 1);
        assert_eq!(format.samples_for(1024), 1024);
        assert_eq!(StreamFormat::new(44100, 2).samples_for(1024), 2048);
        assert_eq!(format.to_string(), "22050Hz/1ch");
    }
}
