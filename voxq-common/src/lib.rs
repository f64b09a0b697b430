//! # voxq Common Library
//!
//! Shared code for the voxq crates:
//! - Player event types and the broadcast event bus
//! - Configuration file discovery and output directory resolution
//! - Common error type

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{EventBus, PlaybackState, PlayerEvent};
