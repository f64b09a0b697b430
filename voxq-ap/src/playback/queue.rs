//! Playback queue and state machine
//!
//! [`PlaybackQueue`] holds the pending tracks, the Idle/Playing state and the
//! skip signal. Every transition is a method here, so the whole state machine
//! can be exercised without a worker thread or an audio device.
//!
//! ```text
//!   Idle --play()--> Playing --queue empty after a track--> Idle
//!     ^                 |
//!     +---shutdown------+----> worker exits
//! ```

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use voxq_common::PlaybackState;

/// An audio file waiting to be played; identity is its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    path: PathBuf,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Result of a successful `play()` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Player moved from Idle to Playing
    Started,
    /// Player was already Playing; nothing changed
    AlreadyPlaying,
}

/// Single-slot skip request
///
/// Raising twice before the worker looks is the same as raising once, and
/// [`SkipSignal::take`] clears the flag in the same atomic step that reads it.
#[derive(Debug, Default)]
pub struct SkipSignal {
    raised: AtomicBool,
}

impl SkipSignal {
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Consume the signal, returning whether it was raised
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Point-in-time copy of the queue for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub state: PlaybackState,
    pub current: Option<Track>,
    pub pending: Vec<Track>,
}

struct QueueInner {
    tracks: VecDeque<Track>,
    state: PlaybackState,
    /// Track the worker is streaming
    current: Option<Track>,
}

/// Thread-safe FIFO drained by one playback worker
pub struct PlaybackQueue {
    inner: Mutex<QueueInner>,

    /// Wakes the worker on Idle -> Playing and on shutdown
    wake: Condvar,

    skip: SkipSignal,

    shut_down: AtomicBool,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                tracks: VecDeque::new(),
                state: PlaybackState::Idle,
                current: None,
            }),
            wake: Condvar::new(),
            skip: SkipSignal::default(),
            shut_down: AtomicBool::new(false),
        }
    }

    // A panic while holding the lock cannot leave QueueInner half-updated,
    // so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a track; returns the new queue length
    pub fn push(&self, track: Track) -> usize {
        let mut inner = self.lock();
        inner.tracks.push_back(track);
        inner.tracks.len()
    }

    /// Idle -> Playing if there is anything to play
    ///
    /// Returns the outcome with the queue length seen under the same lock.
    /// A skip left over from an earlier run is cleared on the transition, so
    /// any skip accepted from here on applies to a track of this run.
    pub fn request_play(&self) -> Result<(PlayOutcome, usize)> {
        let mut inner = self.lock();

        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        if inner.state.is_playing() {
            return Ok((PlayOutcome::AlreadyPlaying, inner.tracks.len()));
        }
        if inner.tracks.is_empty() {
            return Err(Error::EmptyQueue);
        }

        self.skip.take();
        inner.state = PlaybackState::Playing;
        let queued = inner.tracks.len();
        drop(inner);
        self.wake.notify_one();
        Ok((PlayOutcome::Started, queued))
    }

    /// Raise the skip signal if something is playing
    ///
    /// The signal is raised under the queue lock, so it cannot race with the
    /// transitions that clear it.
    pub fn request_skip(&self) -> Result<()> {
        let inner = self.lock();
        if !inner.state.is_playing() {
            return Err(Error::NothingToSkip);
        }
        self.skip.raise();
        Ok(())
    }

    /// Block until there is a track to play.
    ///
    /// Called only by the worker. While Idle this waits on the condition
    /// variable. While Playing it pops the head, falling back to Idle if the
    /// queue turns out to be empty. Returns `None` once shut down.
    pub fn next_track(&self) -> Option<Track> {
        let mut inner = self.lock();
        loop {
            if self.is_shut_down() {
                inner.current = None;
                return None;
            }

            if inner.state.is_playing() {
                match inner.tracks.pop_front() {
                    Some(track) => {
                        inner.current = Some(track.clone());
                        return Some(track);
                    }
                    None => {
                        inner.state = PlaybackState::Idle;
                        self.skip.take();
                    }
                }
            }

            inner = self
                .wake
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark the current track done.
    ///
    /// Returns true when this emptied the queue and moved the player to Idle.
    /// A skip raised after the worker's last check carries over to the next
    /// track; going Idle clears it.
    pub fn finish_track(&self) -> bool {
        let mut inner = self.lock();
        inner.current = None;
        if inner.tracks.is_empty() && inner.state.is_playing() {
            inner.state = PlaybackState::Idle;
            self.skip.take();
            return true;
        }
        false
    }

    pub fn skip_signal(&self) -> &SkipSignal {
        &self.skip
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn len(&self) -> usize {
        self.lock().tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tracks.is_empty()
    }

    pub fn current(&self) -> Option<Track> {
        self.lock().current.clone()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let inner = self.lock();
        QueueSnapshot {
            state: inner.state,
            current: inner.current.clone(),
            pending: inner.tracks.iter().cloned().collect(),
        }
    }

    /// Tell the worker to exit and park the player in Idle. Idempotent.
    ///
    /// Tracks already queued stay listed; later `play()` calls are rejected.
    pub fn shutdown(&self) {
        // Set under the lock so a worker between its check and its wait
        // cannot miss the notification
        let mut inner = self.lock();
        self.shut_down.store(true, Ordering::SeqCst);
        inner.state = PlaybackState::Idle;
        inner.current = None;
        self.skip.take();
        drop(inner);
        self.wake.notify_all();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}
