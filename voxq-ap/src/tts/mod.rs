//! Text-to-speech providers
//!
//! A provider turns text into an audio file on disk. The HTTP layer only talks
//! to the [`TtsProvider`] trait so tests can swap in a local fake.

pub mod script;
pub mod streamelements;
pub mod voices;

pub use script::{assign_voices, parse_script, ScriptSegment, VoicedSegment};
pub use streamelements::{StreamElementsConfig, StreamElementsProvider};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A voice offered by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsVoice {
    pub name: String,
    /// Free-form description; StreamElements does not provide one
    pub characteristic: Option<String>,
}

impl TtsVoice {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            characteristic: None,
        }
    }
}

/// Per-request synthesis options
#[derive(Debug, Clone, Default)]
pub struct SpeakOptions {
    /// Voice to use; provider default when `None`
    pub voice_name: Option<String>,
}

#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    fn voices(&self) -> Vec<TtsVoice>;

    fn default_voice(&self) -> &str;

    fn has_voice(&self, name: &str) -> bool {
        self.voices().iter().any(|v| v.name == name)
    }

    /// Synthesize `text` and write the audio to `path`
    ///
    /// The file is complete when this returns `Ok`.
    ///
    /// # Errors
    /// - `InvalidInput` for blank text
    /// - `Tts` when the remote service fails
    async fn generate_audio_file(&self, text: &str, path: &Path, opts: &SpeakOptions)
        -> Result<()>;
}
