//! The video binding: probe metadata, wall-clock playback and preview frames.

use crate::clock::PlaybackClock;
use crate::decoder::{FrameGrabber, PreviewStream};
use crate::probe::MediaProbe;
use clipmark_core::{ClipMarkError, FrameBuffer, RationalTime, Result};
use clipmark_editor::PlaybackSurface;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A video file bound for playback.
///
/// A file ffprobe cannot read still binds: it reports no dimensions and
/// `play` returns the probe error.
pub struct VideoFile {
    path: PathBuf,
    probe: std::result::Result<MediaProbe, String>,
    clock: PlaybackClock,
    preview_width: u32,
    stream: Option<PreviewStream>,
    /// Last frame handed to the preview.
    shown: Option<FrameBuffer>,
    /// The preview must be refreshed with a single grab (seek while paused).
    stale: bool,
}

impl VideoFile {
    pub fn open(path: &Path, preview_width: u32) -> Result<Self> {
        if !path.is_file() {
            return Err(ClipMarkError::NotFound(path.display().to_string()));
        }
        let probe = MediaProbe::probe(path).and_then(|probe| {
            if probe.has_video() {
                Ok(probe)
            } else {
                Err(ClipMarkError::Media(format!(
                    "{} has no video stream",
                    path.display()
                )))
            }
        });
        let probe = match probe {
            Ok(probe) => {
                let frame_rate = probe
                    .primary_video()
                    .map(|v| v.frame_rate.to_string())
                    .unwrap_or_default();
                info!(
                    path = %path.display(),
                    duration = ?probe.duration,
                    format = %probe.format,
                    %frame_rate,
                    "Video probed"
                );
                Ok(probe)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Video could not be probed");
                Err(e.to_string())
            }
        };
        Ok(Self::bind(path, probe, preview_width))
    }

    fn bind(
        path: &Path,
        probe: std::result::Result<MediaProbe, String>,
        preview_width: u32,
    ) -> Self {
        let duration = probe.as_ref().ok().and_then(|p| p.duration);
        Self {
            path: path.to_path_buf(),
            probe,
            clock: PlaybackClock::new(duration),
            preview_width: preview_width.max(16),
            stream: None,
            shown: None,
            stale: true,
        }
    }

    pub fn probe(&self) -> Option<&MediaProbe> {
        self.probe.as_ref().ok()
    }

    fn restart_stream(&mut self) {
        self.stream = None;
        match PreviewStream::start(&self.path, self.clock.position(), self.preview_width) {
            Ok(stream) => self.stream = Some(stream),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Preview stream failed"),
        }
    }
}

impl PlaybackSurface for VideoFile {
    fn play(&mut self) -> Result<()> {
        if let Err(message) = &self.probe {
            return Err(ClipMarkError::Media(message.clone()));
        }
        if !self.clock.is_paused() && !self.clock.has_ended() {
            return Ok(());
        }
        self.clock.pause();
        self.clock.play();
        self.restart_stream();
        debug!(position = %self.clock.position(), "Video playing");
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.pause();
        if let Some(frame) = self.stream.as_ref().and_then(PreviewStream::latest) {
            self.shown = Some(frame);
        }
        self.stream = None;
    }

    fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    fn has_ended(&self) -> bool {
        self.clock.has_ended()
    }

    fn seek(&mut self, position: RationalTime) {
        self.clock.seek(position);
        if self.clock.is_paused() {
            self.stream = None;
            self.stale = true;
        } else if self.probe.is_ok() {
            self.restart_stream();
        }
    }

    fn position(&self) -> RationalTime {
        self.clock.position()
    }

    fn duration(&self) -> Option<RationalTime> {
        self.clock.duration()
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.probe()
            .and_then(MediaProbe::primary_video)
            .map(|v| (v.width, v.height))
    }

    fn current_frame(&mut self) -> Result<FrameBuffer> {
        if let Err(message) = &self.probe {
            return Err(ClipMarkError::Media(message.clone()));
        }
        FrameGrabber::grab(&self.path, self.clock.position(), None)
    }

    fn preview_frame(&mut self) -> Option<FrameBuffer> {
        if let Some(frame) = self.stream.as_ref().and_then(PreviewStream::latest) {
            self.shown = Some(frame);
        } else if self.stale && self.probe.is_ok() {
            self.stale = false;
            match FrameGrabber::grab(&self.path, self.clock.position(), Some(self.preview_width)) {
                Ok(frame) => self.shown = Some(frame),
                Err(e) => debug!(error = %e, "Preview grab failed"),
            }
        }
        self.shown.clone()
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn release(&mut self) {
        self.clock.pause();
        self.stream = None;
        self.shown = None;
        info!(path = %self.path.display(), "Video released");
    }
}
