//! ClipMark Audio - background music playback
//!
//! Architecture:
//! - `PcmFeed`: ffmpeg decode thread producing interleaved f32 samples
//! - `RingBuffer`: lock-free SPSC queue between the feed and the device
//! - `AudioOutput`: cpal stream draining the queue
//! - `AudioEngine`: one playable, optionally looping track

pub mod feed;
pub mod output;
pub mod ring_buffer;

pub use feed::{FeedConfig, PcmFeed};
pub use output::{AudioOutput, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE};
pub use ring_buffer::RingBuffer;

use clipmark_core::{ClipMarkError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Queue length: half a second of 48 kHz stereo.
const QUEUE_SAMPLES: usize = OUTPUT_SAMPLE_RATE as usize * OUTPUT_CHANNELS as usize / 2;

/// Plays one audio file through the default output device.
pub struct AudioEngine {
    config: FeedConfig,
    ffmpeg: PathBuf,
    output: AudioOutput,
    feed: Option<PcmFeed>,
}

impl AudioEngine {
    /// Open `path` for playback. Nothing is decoded until the first `play`.
    pub fn open(path: &Path, looping: bool) -> Result<Self> {
        if !path.is_file() {
            return Err(ClipMarkError::NotFound(path.display().to_string()));
        }
        let buffer = Arc::new(RingBuffer::new(QUEUE_SAMPLES));
        let output = AudioOutput::open(buffer)?;
        let config = FeedConfig::new(path, output.sample_rate(), output.channels()).looping(looping);
        info!(path = %path.display(), looping, "Audio engine ready");
        Ok(Self {
            config,
            ffmpeg: ffmpeg_sidecar::paths::ffmpeg_path(),
            output,
            feed: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn play(&mut self) -> Result<()> {
        if !self.feed.as_ref().is_some_and(PcmFeed::is_running) && self.output.buffer().is_empty() {
            self.start_feed()?;
        }
        self.output.resume();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.output.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.output.is_paused()
    }

    /// Seconds delivered to the device since the last restart.
    pub fn position_seconds(&self) -> f64 {
        self.output.played_seconds()
    }

    /// Rewind to the start of the file, keeping the paused state.
    pub fn restart(&mut self) -> Result<()> {
        let was_paused = self.output.is_paused();
        self.output.pause();
        self.feed = None;
        self.output.buffer().clear();
        self.output.reset_clock();
        self.start_feed()?;
        if !was_paused {
            self.output.resume();
        }
        Ok(())
    }

    /// Stop decoding and the device stream.
    pub fn release(&mut self) {
        self.feed = None;
        self.output.close();
        self.output.buffer().clear();
        info!(path = %self.config.path.display(), "Audio engine released");
    }

    fn start_feed(&mut self) -> Result<()> {
        self.feed = None;
        let feed = PcmFeed::start(&self.config, &self.ffmpeg, Arc::clone(self.output.buffer()))?;
        self.feed = Some(feed);
        Ok(())
    }
}
