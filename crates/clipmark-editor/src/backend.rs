//! Seams between the editor and the native media subsystems.
//!
//! The editor only talks to these traits. `clipmark-media` provides the
//! ffmpeg/cpal implementations; tests substitute in-memory fakes.

use crate::capture::SessionId;
use clipmark_core::{FrameBuffer, Overlay, RationalTime, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A time-based playback surface (the video binding).
pub trait PlaybackSurface {
    /// Start or resume playback.
    ///
    /// Undecodable media reports its failure here, not at load time.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Playback ran into the end of the media and is held at its last frame.
    fn has_ended(&self) -> bool {
        false
    }

    fn seek(&mut self, position: RationalTime);

    /// Current play-head position.
    fn position(&self) -> RationalTime;

    /// Total duration, when known.
    fn duration(&self) -> Option<RationalTime>;

    /// Native pixel dimensions, once enough data is buffered to know them.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Decode the frame at the current position at native resolution.
    fn current_frame(&mut self) -> Result<FrameBuffer>;

    /// Latest frame for on-screen preview, possibly downscaled.
    fn preview_frame(&mut self) -> Option<FrameBuffer> {
        None
    }

    fn source_path(&self) -> &Path;

    /// Release decoder and output resources before the binding is dropped.
    fn release(&mut self) {}
}

/// A still image surface (the photo binding).
pub trait StillSurface {
    /// Decoded pixels. An undecodable file binds anyway and reports its
    /// failure here.
    fn frame(&self) -> Result<&FrameBuffer>;

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.frame().ok().map(FrameBuffer::dimensions)
    }

    fn source_path(&self) -> &Path;

    fn release(&mut self) {}
}

/// Background music handle.
pub trait AudioTrack {
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Rewind to the beginning without changing the paused state.
    fn restart(&mut self);

    fn release(&mut self) {}
}

/// Turns user-selected files into playback bindings.
pub trait MediaOpener {
    fn open_video(&mut self, path: &Path) -> Result<Box<dyn PlaybackSurface>>;

    fn open_photo(&mut self, path: &Path) -> Result<Box<dyn StillSurface>>;

    fn open_audio(&mut self, path: &Path) -> Result<Box<dyn AudioTrack>>;
}

/// What a capture tap should record.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub session: SessionId,
    /// Media whose rendered output is tapped.
    pub source: PathBuf,
    /// Position playback starts from.
    pub start: RationalTime,
    /// Planned capture length; the tap is stopped explicitly.
    pub length: Duration,
}

/// Live stream tap feeding a buffering recorder.
///
/// Implementations report back through `EditorEvent::DataAvailable`,
/// `EditorEvent::RecorderStopped` and `EditorEvent::RecorderFailed`, each
/// tagged with the session id.
pub trait CaptureTap {
    fn open(&mut self, request: &CaptureRequest) -> Result<()>;

    /// Ask the recorder to finish. Stopping an unknown session is a no-op.
    fn stop(&mut self, session: SessionId);
}

/// One-shot deferred stop timer, measured in wall-clock time.
pub trait StopScheduler {
    /// Fire `EditorEvent::StopTimerFired(session)` after `after`.
    fn schedule(&mut self, session: SessionId, after: Duration);

    fn cancel(&mut self, session: SessionId);
}

/// Renders a frame (plus caption) into a lossless image file.
pub trait StillEncoder {
    fn encode(&mut self, frame: FrameBuffer, overlay: Option<&Overlay>) -> Result<Vec<u8>>;
}

/// Offers a finished artifact to the user as a downloaded file.
pub trait ArtifactSink {
    /// Store `bytes` under `file_name`, returning where it landed.
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}
