//! WAV file helpers
//!
//! Multi-speaker synthesis produces one file per segment; these are joined
//! into a single track before it is queued.

use crate::error::{Error, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Concatenate WAV files into `output`, in order.
///
/// All inputs must share the same channel count, sample rate, bit depth and
/// sample format.
pub fn concatenate_wav_files(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let first = inputs
        .first()
        .ok_or_else(|| Error::InvalidInput("No audio segments to concatenate".to_string()))?;

    let spec = WavReader::open(first)?.spec();
    let mut writer = WavWriter::create(output, spec)?;

    for input in inputs {
        let mut reader = WavReader::open(input)?;
        check_compatible(&spec, &reader.spec(), input)?;

        match spec.sample_format {
            SampleFormat::Int => {
                for sample in reader.samples::<i32>() {
                    writer.write_sample(sample?)?;
                }
            }
            SampleFormat::Float => {
                for sample in reader.samples::<f32>() {
                    writer.write_sample(sample?)?;
                }
            }
        }
    }

    writer.finalize()?;
    debug!("Concatenated {} segments into {}", inputs.len(), output.display());
    Ok(())
}

fn check_compatible(expected: &WavSpec, actual: &WavSpec, path: &Path) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(Error::InvalidInput(format!(
        "{} has format {}Hz/{}ch/{}bit, expected {}Hz/{}ch/{}bit",
        path.display(),
        actual.sample_rate,
        actual.channels,
        actual.bits_per_sample,
        expected.sample_rate,
        expected.channels,
        expected.bits_per_sample
    )))
}
