//! Audio test file generation
//!
//! Deterministic WAV files with known frame counts for playback tests.

use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Sample rate used by the short test tracks
pub const TEST_SAMPLE_RATE: u32 = 8000;

/// Generate a mono 16-bit sine wave with an exact frame count
///
/// Playback tests use low-rate mono files so tracks stay small while still
/// spanning many chunks.
pub fn generate_tone_frames<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    frames: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let amplitude = (0.5 * i16::MAX as f32) as i16;

    for frame_idx in 0..frames {
        let t = frame_idx as f32 / sample_rate as f32;
        let sample = ((2.0 * PI * 440.0 * t).sin() * amplitude as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Generate a mono test track at [`TEST_SAMPLE_RATE`]
pub fn generate_test_track<P: AsRef<Path>>(path: P, frames: u32) -> Result<(), hound::Error> {
    generate_tone_frames(path, TEST_SAMPLE_RATE, 1, frames)
}

/// Generate silent stereo 44.1 kHz WAV file
pub fn generate_silent_wav<P: AsRef<Path>>(path: P, duration_ms: u64) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    let total_frames = (44100 * duration_ms) / 1000;
    for _ in 0..total_frames * 2 {
        writer.write_sample(0i16)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Write bytes that no audio probe will accept
pub fn write_corrupt_file<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    std::fs::write(path, b"RIFX\x00\x00\x00\x00this is not audio at all")
}
