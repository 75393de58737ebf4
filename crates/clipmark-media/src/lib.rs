//! ClipMark Media - native media subsystems over FFmpeg
//!
//! This crate handles:
//! - Media file probing (ffprobe)
//! - Wall-clock playback and preview frame decoding
//! - Photo decoding and PNG still capture with captions
//! - Real-time WebM clip recording
//! - Download directory, stop timers and the file opener

pub mod clock;
pub mod decoder;
pub mod fonts;
pub mod music;
pub mod opener;
pub mod photo;
pub mod probe;
pub mod recorder;
pub mod sink;
pub mod still;
pub mod timer;
pub mod video;

pub use clock::PlaybackClock;
pub use decoder::{FrameGrabber, PreviewStream};
pub use fonts::{load_font, locate_sans_serif};
pub use music::BackgroundTrack;
pub use opener::{FileOpener, DEFAULT_PREVIEW_WIDTH};
pub use photo::PhotoImage;
pub use probe::MediaProbe;
pub use recorder::{ClipFormat, FfmpegRecorder};
pub use sink::DownloadDir;
pub use still::{CaptionPainter, PngStillEncoder, CAPTION_FONT_PX};
pub use timer::ThreadScheduler;
pub use video::VideoFile;

/// Check for a usable ffmpeg (call once at startup).
///
/// Returns whether ffmpeg can be run; media actions fail individually when
/// it cannot.
pub fn init() -> bool {
    let installed = ffmpeg_sidecar::command::ffmpeg_is_installed();
    if installed {
        tracing::info!(
            ffmpeg = %ffmpeg_sidecar::paths::ffmpeg_path().display(),
            "ClipMark Media initialized"
        );
    } else {
        tracing::warn!("ffmpeg not found on PATH or next to the executable");
    }
    installed
}
