//! In-memory audio sink
//!
//! Stands in for a real device: records every stream opened on it and how
//! many frames were written, and applies a fixed delay per write so playback
//! takes real time.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use voxq_ap::audio::{AudioSink, AudioStream, StreamFormat};
use voxq_ap::{Error, Result};

/// What happened to one opened stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub format: StreamFormat,
    pub frames_written: u64,
    pub drained: bool,
    pub closed: bool,
}

#[derive(Debug, Default)]
struct SinkState {
    streams: Vec<StreamRecord>,
    terminated: bool,
}

pub struct RecordingSink {
    state: Arc<Mutex<SinkState>>,
    write_delay: Duration,
}

impl RecordingSink {
    pub fn new(write_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SinkState::default())),
            write_delay,
        }
    }

    pub fn streams(&self) -> Vec<StreamRecord> {
        self.state.lock().unwrap().streams.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().unwrap().streams.len()
    }

    pub fn total_frames(&self) -> u64 {
        self.streams().iter().map(|s| s.frames_written).sum()
    }

    /// Frames written so far to the stream opened `index`-th
    pub fn frames_in_stream(&self, index: usize) -> u64 {
        self.state
            .lock()
            .unwrap()
            .streams
            .get(index)
            .map_or(0, |s| s.frames_written)
    }

    pub fn is_terminated(&self) -> bool {
        self.state.lock().unwrap().terminated
    }
}

impl AudioSink for RecordingSink {
    fn open(&self, format: StreamFormat) -> Result<Box<dyn AudioStream>> {
        let mut state = self.state.lock().unwrap();
        if state.terminated {
            return Err(Error::AudioOutput("sink shut down".to_string()));
        }
        state.streams.push(StreamRecord {
            format,
            frames_written: 0,
            drained: false,
            closed: false,
        });

        Ok(Box::new(RecordingStream {
            state: Arc::clone(&self.state),
            index: state.streams.len() - 1,
            channels: format.channels,
            write_delay: self.write_delay,
        }))
    }

    fn shutdown(&self) {
        self.state.lock().unwrap().terminated = true;
    }

    fn name(&self) -> String {
        "recording".to_string()
    }
}

struct RecordingStream {
    state: Arc<Mutex<SinkState>>,
    index: usize,
    channels: u16,
    write_delay: Duration,
}

impl AudioStream for RecordingStream {
    fn write(&mut self, samples: &[f32]) -> Result<()> {
        if !self.write_delay.is_zero() {
            thread::sleep(self.write_delay);
        }

        // Checked under the lock so nothing is recorded once shutdown returns
        let mut state = self.state.lock().unwrap();
        if state.terminated {
            return Err(Error::AudioOutput("sink shut down".to_string()));
        }
        state.streams[self.index].frames_written += (samples.len() / self.channels as usize) as u64;
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        self.state.lock().unwrap().streams[self.index].drained = true;
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().unwrap().streams[self.index].closed = true;
    }
}
