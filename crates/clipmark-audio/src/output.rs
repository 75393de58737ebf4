//! cpal output stream draining a [`RingBuffer`].

use crate::ring_buffer::RingBuffer;
use clipmark_core::{ClipMarkError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Default output format: 48 kHz stereo.
pub const OUTPUT_SAMPLE_RATE: u32 = 48_000;
pub const OUTPUT_CHANNELS: u16 = 2;

/// Playback device handle.
///
/// The callback never blocks: it pops what the feed has produced and pads
/// underruns with silence. While paused it writes silence and leaves the
/// queue untouched.
pub struct AudioOutput {
    stream: Stream,
    buffer: Arc<RingBuffer>,
    paused: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default output device, initially paused.
    pub fn open(buffer: Arc<RingBuffer>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| ClipMarkError::Audio("no audio output device".to_string()))?;
        info!(
            device = device.name().unwrap_or_else(|_| "unknown".into()).as_str(),
            "Opening audio output"
        );

        let config = StreamConfig {
            channels: OUTPUT_CHANNELS,
            sample_rate: SampleRate(OUTPUT_SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let paused = Arc::new(AtomicBool::new(true));
        let delivered = Arc::new(AtomicU64::new(0));
        let cb_buffer = Arc::clone(&buffer);
        let cb_paused = Arc::clone(&paused);
        let cb_delivered = Arc::clone(&delivered);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if cb_paused.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    let n = cb_buffer.fill(data);
                    cb_delivered.fetch_add(n as u64, Ordering::Relaxed);
                },
                |err| error!(error = %err, "Audio output stream error"),
                None,
            )
            .map_err(|e| ClipMarkError::Audio(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| ClipMarkError::Audio(format!("failed to start output stream: {e}")))?;
        debug!(
            sample_rate = OUTPUT_SAMPLE_RATE,
            channels = OUTPUT_CHANNELS,
            "Audio output stream running"
        );

        Ok(Self {
            stream,
            buffer,
            paused,
            delivered,
            sample_rate: OUTPUT_SAMPLE_RATE,
            channels: OUTPUT_CHANNELS,
        })
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Seconds of audio actually delivered to the device.
    pub fn played_seconds(&self) -> f64 {
        let samples = self.delivered.load(Ordering::Relaxed);
        samples as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    pub fn reset_clock(&self) {
        self.delivered.store(0, Ordering::Relaxed);
    }

    pub fn buffer(&self) -> &Arc<RingBuffer> {
        &self.buffer
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Stop the device stream.
    pub fn close(&self) {
        self.pause();
        if let Err(e) = self.stream.pause() {
            debug!(error = %e, "Audio stream pause failed");
        }
    }
}
