//! The background music binding: a looping track on the audio device.

use crate::clock::PlaybackClock;
use clipmark_audio::AudioEngine;
use clipmark_core::{ClipMarkError, Result};
use clipmark_editor::AudioTrack;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Looping background track.
///
/// Without a usable output device the track keeps only its clock and
/// plays silently.
pub struct BackgroundTrack {
    path: PathBuf,
    engine: Option<AudioEngine>,
    clock: PlaybackClock,
}

impl BackgroundTrack {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ClipMarkError::NotFound(path.display().to_string()));
        }
        let engine = match AudioEngine::open(path, true) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "No audio output, music will be silent");
                None
            }
        };
        info!(path = %path.display(), audible = engine.is_some(), "Background track bound");
        Ok(Self {
            path: path.to_path_buf(),
            engine,
            clock: PlaybackClock::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_audible(&self) -> bool {
        self.engine.is_some()
    }

    /// Seconds since the track last started from the top.
    pub fn elapsed_seconds(&self) -> f64 {
        match &self.engine {
            Some(engine) => engine.position_seconds(),
            None => self.clock.position().to_seconds_f64(),
        }
    }
}

impl AudioTrack for BackgroundTrack {
    fn play(&mut self) -> Result<()> {
        if let Some(engine) = self.engine.as_mut() {
            engine.play()?;
        }
        self.clock.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
        self.clock.pause();
    }

    fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    fn restart(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.restart() {
                warn!(path = %self.path.display(), error = %e, "Music restart failed");
            }
        }
        self.clock.seek(clipmark_core::RationalTime::ZERO);
    }

    fn release(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.release();
        }
        self.engine = None;
        self.clock.pause();
    }
}
