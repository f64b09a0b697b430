//! Audio decoding, output and file helpers

pub mod decode;
pub mod output;
pub mod sink;
pub mod wav;

pub use decode::TrackReader;
pub use output::CpalSink;
pub use sink::{AudioSink, AudioStream, StreamFormat, StreamGuard};
