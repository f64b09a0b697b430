//! Audio output using cpal
//!
//! [`CpalSink`] opens one cpal stream per track at the track's native format.
//! The worker pushes samples into a lock-free ring buffer and the cpal
//! callback pops them, emitting silence on underrun.

use crate::audio::sink::{AudioSink, AudioStream, StreamFormat};
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SizedSample, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Ring buffer length as a fraction of a second of audio
const RING_BUFFER_DIVISOR: u32 = 4;

/// Sleep between attempts to push into a full ring buffer
const WRITE_BACKOFF: Duration = Duration::from_millis(5);

/// Extra time allowed for the device to consume the ring buffer on drain
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Audio sink backed by the system's cpal host
pub struct CpalSink {
    /// Requested device name (None = default device)
    device_name: Option<String>,
    /// Requested device buffer size in frames (None = device default)
    buffer_frames: Option<u32>,
    /// Set by shutdown; observed by the callback and every open stream
    terminated: Arc<AtomicBool>,
}

impl CpalSink {
    pub fn new(device_name: Option<String>, buffer_frames: Option<u32>) -> Self {
        Self {
            device_name,
            buffer_frames,
            terminated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// List available audio output devices.
    ///
    /// Used by GET /api/audio/devices.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();

        let devices: Vec<String> = host
            .output_devices()
            .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();

        debug!("Found {} output devices", devices.len());
        Ok(devices)
    }

    /// Find the requested device, falling back to the default one
    fn select_device(&self) -> Result<Device> {
        let host = cpal::default_host();

        if let Some(name) = self.device_name.as_ref() {
            let mut devices = host
                .output_devices()
                .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?;

            if let Some(dev) = devices.find(|d| d.name().ok().as_ref() == Some(name)) {
                return Ok(dev);
            }

            warn!("Requested device '{}' not found, falling back to default device", name);
            return host.default_output_device().ok_or_else(|| {
                Error::AudioOutput(format!(
                    "Device '{}' not found and no default device available",
                    name
                ))
            });
        }

        host.default_output_device()
            .ok_or_else(|| Error::AudioOutput("No default output device found".to_string()))
    }

    /// Pick a device configuration matching the track format exactly.
    ///
    /// Prefers f32 samples, then i16, then u16.
    fn select_config(
        &self,
        device: &Device,
        format: StreamFormat,
    ) -> Result<(StreamConfig, SampleFormat)> {
        let supported: Vec<_> = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("Failed to get device configs: {}", e)))?
            .filter(|config| {
                config.channels() == format.channels
                    && config.min_sample_rate().0 <= format.sample_rate
                    && config.max_sample_rate().0 >= format.sample_rate
            })
            .collect();

        let chosen = [SampleFormat::F32, SampleFormat::I16, SampleFormat::U16]
            .iter()
            .find_map(|wanted| supported.iter().find(|c| c.sample_format() == *wanted))
            .ok_or_else(|| {
                Error::AudioOutput(format!("Device does not support {} output", format))
            })?;

        let sample_format = chosen.sample_format();
        let mut config = chosen
            .clone()
            .with_sample_rate(cpal::SampleRate(format.sample_rate))
            .config();

        if let Some(size) = self.buffer_frames {
            config.buffer_size = cpal::BufferSize::Fixed(size);
        }

        Ok((config, sample_format))
    }
}

impl AudioSink for CpalSink {
    fn open(&self, format: StreamFormat) -> Result<Box<dyn AudioStream>> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(Error::AudioOutput("Audio sink has been shut down".to_string()));
        }

        let device = self.select_device()?;
        let (config, sample_format) = self.select_config(&device, format)?;

        let capacity = format.samples_for((format.sample_rate / RING_BUFFER_DIVISOR).max(1) as usize);
        let (producer, consumer) = HeapRb::<f32>::new(capacity).split();
        let error_flag = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream(
                &device,
                &config,
                consumer,
                |s| s,
                0.0f32,
                Arc::clone(&self.terminated),
                Arc::clone(&error_flag),
            )?,
            SampleFormat::I16 => build_stream(
                &device,
                &config,
                consumer,
                f32_to_i16,
                0i16,
                Arc::clone(&self.terminated),
                Arc::clone(&error_flag),
            )?,
            SampleFormat::U16 => build_stream(
                &device,
                &config,
                consumer,
                f32_to_u16,
                U16_SILENCE,
                Arc::clone(&self.terminated),
                Arc::clone(&error_flag),
            )?,
            other => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {:?}",
                    other
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {}", e)))?;

        debug!(
            "Opened output stream: {} {:?} buffer={:?}",
            format, sample_format, config.buffer_size
        );

        Ok(Box::new(CpalStream {
            stream: Some(stream),
            producer,
            sample_rate: format.sample_rate,
            channels: format.channels,
            error_flag,
            terminated: Arc::clone(&self.terminated),
        }))
    }

    fn shutdown(&self) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            info!("Audio sink shut down");
        }
    }

    fn name(&self) -> String {
        match &self.device_name {
            Some(name) => format!("cpal:{}", name),
            None => "cpal:default".to_string(),
        }
    }
}

const U16_SILENCE: u16 = 32768;

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn f32_to_u16(sample: f32) -> u16 {
    // [-1.0, 1.0] to [0, 65535]
    ((sample.clamp(-1.0, 1.0) + 1.0) * 32767.5) as u16
}

/// Build an output stream that pops converted samples from the ring buffer
fn build_stream<T, F>(
    device: &Device,
    config: &StreamConfig,
    mut consumer: HeapCons<f32>,
    convert: F,
    silence: T,
    terminated: Arc<AtomicBool>,
    error_flag: Arc<AtomicBool>,
) -> Result<Stream>
where
    T: SizedSample + Send + 'static,
    F: Fn(f32) -> T + Send + 'static,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if terminated.load(Ordering::Relaxed) {
                    data.fill(silence);
                    return;
                }
                for slot in data.iter_mut() {
                    *slot = match consumer.try_pop() {
                        Some(sample) => convert(sample),
                        None => silence,
                    };
                }
            },
            move |err| {
                error!("Audio stream error: {}", err);
                error_flag.store(true, Ordering::SeqCst);
            },
            None,
        )
        .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))
}

/// One open cpal stream; lives and dies on the playback worker thread
struct CpalStream {
    stream: Option<Stream>,
    producer: HeapProd<f32>,
    sample_rate: u32,
    channels: u16,
    error_flag: Arc<AtomicBool>,
    terminated: Arc<AtomicBool>,
}

impl CpalStream {
    fn check_alive(&self) -> Result<()> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(Error::AudioOutput("Audio sink has been shut down".to_string()));
        }
        if self.error_flag.load(Ordering::SeqCst) {
            return Err(Error::AudioOutput("Output stream reported an error".to_string()));
        }
        if self.stream.is_none() {
            return Err(Error::AudioOutput("Output stream is closed".to_string()));
        }
        Ok(())
    }
}

impl AudioStream for CpalStream {
    fn write(&mut self, samples: &[f32]) -> Result<()> {
        let mut offset = 0;
        while offset < samples.len() {
            self.check_alive()?;
            let pushed = self.producer.push_slice(&samples[offset..]);
            offset += pushed;
            if pushed == 0 {
                thread::sleep(WRITE_BACKOFF);
            }
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        let buffered_frames = self.producer.occupied_len() / self.channels.max(1) as usize;
        let buffered = Duration::from_secs_f64(buffered_frames as f64 / self.sample_rate as f64);
        let deadline = Instant::now() + buffered + DRAIN_GRACE;

        while !self.producer.is_empty() {
            self.check_alive()?;
            if Instant::now() >= deadline {
                warn!("Output stream did not drain in time, dropping remaining samples");
                break;
            }
            thread::sleep(WRITE_BACKOFF);
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("Failed to pause stream: {}", e);
            }
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.close();
    }
}
