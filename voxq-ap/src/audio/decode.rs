//! Incremental track decoding using symphonia
//!
//! [`TrackReader`] opens a file, validates that it holds a playable audio
//! stream, and hands out interleaved `f32` chunks of a fixed frame count so the
//! playback worker can check for skip requests between device writes.
//!
//! Samples keep the file's native rate and channel layout. No resampling or
//! remixing is done here.

use crate::audio::sink::StreamFormat;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Streaming decoder for one track
pub struct TrackReader {
    path: PathBuf,

    /// Symphonia format reader
    format: Box<dyn FormatReader>,

    /// Symphonia decoder
    decoder: Box<dyn Decoder>,

    /// Track index being decoded
    track_id: u32,

    stream_format: StreamFormat,

    /// Decoded samples not yet handed out
    pending: Vec<f32>,

    /// Set once the format reader reports end of stream
    exhausted: bool,
}

impl TrackReader {
    /// Open and validate an audio file
    ///
    /// # Errors
    /// - File cannot be opened
    /// - Container not recognised, or no decodable audio track
    /// - Sample rate or channel count missing from the stream
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path)
            .map_err(|e| Error::Decode(format!("Failed to open {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create hint from file extension
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| {
                Error::Decode(format!("{} is not a readable audio stream: {}", path.display(), e))
            })?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode(format!("No audio track found in {}", path.display())))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode(format!("Sample rate not found in {}", path.display())))?;

        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .filter(|&c| c > 0)
            .ok_or_else(|| Error::Decode(format!("Channel count not found in {}", path.display())))?;

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        debug!(
            "Opened {}: sample_rate={}, channels={}",
            path.display(),
            sample_rate,
            channels
        );

        Ok(Self {
            path,
            format,
            decoder,
            track_id,
            stream_format: StreamFormat::new(sample_rate, channels),
            pending: Vec::new(),
            exhausted: false,
        })
    }

    /// Native format of the track
    pub fn format(&self) -> StreamFormat {
        self.stream_format
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next chunk of up to `frames` interleaved frames
    ///
    /// Every chunk holds exactly `frames` frames except the last one.
    /// Returns `Ok(None)` once the stream is exhausted.
    pub fn next_chunk(&mut self, frames: usize) -> Result<Option<Vec<f32>>> {
        let wanted = self.stream_format.samples_for(frames.max(1));

        while self.pending.len() < wanted && !self.exhausted {
            self.decode_next_packet()?;
        }

        if self.pending.is_empty() {
            return Ok(None);
        }

        let take = wanted.min(self.pending.len());
        Ok(Some(self.pending.drain(..take).collect()))
    }

    /// Decode one packet into `pending`, or mark the stream exhausted
    fn decode_next_packet(&mut self) -> Result<()> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                return Ok(());
            }
            Err(SymphoniaError::ResetRequired) => {
                // Track list changed mid-stream; treat as end of this track
                self.exhausted = true;
                return Ok(());
            }
            Err(e) => {
                return Err(Error::Decode(format!(
                    "Failed to read packet from {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        // Skip packets from other tracks
        if packet.track_id() != self.track_id {
            return Ok(());
        }

        match self.decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                self.pending.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packet: drop it and keep going
                warn!("Skipping undecodable packet in {}: {}", self.path.display(), e);
            }
            Err(e) => {
                return Err(Error::Decode(format!(
                    "Decode failed for {}: {}",
                    self.path.display(),
                    e
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: u32) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            let value = ((i % 100) as i16 - 50) * 200;
            for _ in 0..channels {
                writer.write_sample(value).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_nonexistent_file() {
        let result = TrackReader::open("/nonexistent/file.wav");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_rejects_non_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"this is definitely not a RIFF header").unwrap();

        assert!(matches!(TrackReader::open(&path), Err(Error::Decode(_))));
    }

    #[test]
    fn test_reports_native_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 22050, 1, 500);

        let reader = TrackReader::open(&path).unwrap();
        assert_eq!(reader.format(), StreamFormat::new(22050, 1));
        assert_eq!(reader.path(), path.as_path());
    }

    #[test]
    fn test_chunks_cover_whole_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 44100, 2, 5000);

        let mut reader = TrackReader::open(&path).unwrap();
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk(1024).unwrap() {
            chunks.push(chunk.len() / 2);
        }

        assert_eq!(chunks.iter().sum::<usize>(), 5000);
        // All but the last chunk are full
        let (last, full) = chunks.split_last().unwrap();
        assert!(full.iter().all(|&frames| frames == 1024));
        assert_eq!(*last, 5000 - 1024 * 4);

        // Stays exhausted
        assert!(reader.next_chunk(1024).unwrap().is_none());
    }

    #[test]
    fn test_samples_are_normalised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("norm.wav");
        write_wav(&path, 8000, 1, 200);

        let mut reader = TrackReader::open(&path).unwrap();
        let chunk = reader.next_chunk(200).unwrap().unwrap();
        assert!(chunk.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(chunk.iter().any(|s| *s != 0.0));
    }
}
