//! Configuration management for voxq-ap
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (`--port`, `--output-dir`, `--device`), which
//!    clap also fills from `PORT`, `VOXQ_OUTPUT_DIR` and `VOXQ_AUDIO_DEVICE`
//! 2. TOML configuration file
//! 3. Built-in defaults
//!
//! A missing config file is not an error; every setting has a default.

use crate::error::{Error, Result};
use crate::playback::{PlaybackOptions, DEFAULT_CHUNK_FRAMES};
use crate::tts::streamelements::{DEFAULT_VOICE, STREAM_ELEMENTS_ENDPOINT};
use crate::tts::StreamElementsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable consulted for the output directory
pub const OUTPUT_DIR_ENV: &str = "VOXQ_OUTPUT_DIR";

/// Configuration as read from the TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory generated audio is written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            output_dir: None,
            tts: TtsConfig::default(),
            audio: AudioConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Speech synthesis settings
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Request timeout in seconds
    #[serde(default = "default_tts_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            default_voice: default_voice(),
            timeout_secs: default_tts_timeout_secs(),
        }
    }
}

/// Output device settings
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Output device name (default device when absent)
    #[serde(default)]
    pub device: Option<String>,

    /// Frames per device write; bounds skip latency
    #[serde(default = "default_chunk_frames")]
    pub chunk_frames: usize,

    /// Device buffer size in frames (device default when absent)
    #[serde(default)]
    pub buffer_frames: Option<u32>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            chunk_frames: default_chunk_frames(),
            buffer_frames: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    8000
}

fn default_tts_endpoint() -> String {
    STREAM_ELEMENTS_ENDPOINT.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_tts_timeout_secs() -> u64 {
    20
}

fn default_chunk_frames() -> usize {
    DEFAULT_CHUNK_FRAMES
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub output_dir: Option<PathBuf>,
    pub device: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub output_dir: PathBuf,
    pub tts: TtsConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `toml_path` the file must exist and parse. Without
    /// one, the platform config locations are searched and built-in defaults
    /// are used when nothing is found.
    ///
    /// # Errors
    /// - Explicit TOML file cannot be read
    /// - TOML cannot be parsed
    pub async fn load(toml_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let path = match toml_path {
            Some(path) => Some(path.to_path_buf()),
            None => voxq_common::config::find_config_file().ok(),
        };

        let toml_config = match &path {
            Some(path) => {
                let toml_str = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
                })?;
                let parsed = Self::parse_toml(&toml_str)?;
                info!("Loaded TOML configuration from {}", path.display());
                parsed
            }
            None => {
                debug!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        Ok(Self::from_toml(toml_config, path, overrides))
    }

    pub fn parse_toml(toml_str: &str) -> Result<TomlConfig> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply overrides on top of file settings
    pub fn from_toml(
        toml_config: TomlConfig,
        source: Option<PathBuf>,
        overrides: ConfigOverrides,
    ) -> Self {
        let output_dir = voxq_common::config::resolve_output_dir(
            overrides.output_dir.as_deref(),
            OUTPUT_DIR_ENV,
            toml_config.output_dir.as_deref(),
        );

        let mut audio = toml_config.audio;
        if overrides.device.is_some() {
            audio.device = overrides.device;
        }

        Self {
            port: overrides.port.unwrap_or(toml_config.port),
            output_dir,
            tts: toml_config.tts,
            audio,
            logging: toml_config.logging,
            source,
        }
    }

    /// Default `EnvFilter` directives when `RUST_LOG` is unset
    pub fn log_filter(&self) -> String {
        format!("voxq_ap={0},tower_http={0}", self.logging.level)
    }

    pub fn stream_elements(&self) -> StreamElementsConfig {
        StreamElementsConfig {
            endpoint: self.tts.endpoint.clone(),
            default_voice: self.tts.default_voice.clone(),
            timeout: Duration::from_secs(self.tts.timeout_secs),
        }
    }

    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            chunk_frames: self.audio.chunk_frames,
            ..Default::default()
        }
    }
}
