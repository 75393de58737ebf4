//! Frame decoding using FFmpeg via ffmpeg-sidecar.
//!
//! `FrameGrabber` decodes one frame on demand (still capture, paused
//! preview). `PreviewStream` runs a paced decode on a worker thread while
//! playback is running and keeps only the most recent frame.

use clipmark_core::{ClipMarkError, FrameBuffer, RationalTime, Result};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::OutputVideoFrame;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

fn seek_arg(at: RationalTime) -> String {
    format!("{:.3}", at.to_seconds_f64().max(0.0))
}

/// Downscale filter keeping the aspect ratio and an even height.
fn scale_filter(max_width: u32) -> String {
    format!("scale='min({max_width},iw)':-2")
}

fn to_frame_buffer(frame: OutputVideoFrame) -> Result<FrameBuffer> {
    FrameBuffer::from_rgb24(frame.width, frame.height, &frame.data)
}

fn grab_command(path: &Path, at: RationalTime, max_width: Option<u32>) -> FfmpegCommand {
    let mut command = FfmpegCommand::new();
    command.seek(seek_arg(at)).input(path).arg("-an").frames(1);
    if let Some(width) = max_width {
        command.args(["-vf", scale_filter(width).as_str()]);
    }
    command.rawvideo();
    command
}

/// One-shot frame decoder.
pub struct FrameGrabber;

impl FrameGrabber {
    /// Decode the frame shown at `at`, optionally downscaled to `max_width`.
    pub fn grab(path: &Path, at: RationalTime, max_width: Option<u32>) -> Result<FrameBuffer> {
        let mut child = grab_command(path, at, max_width)
            .spawn()
            .map_err(|e| ClipMarkError::Decoder(format!("failed to start ffmpeg: {e}")))?;

        let frame = child
            .iter()
            .map_err(|e| ClipMarkError::Decoder(e.to_string()))?
            .filter_frames()
            .next();
        let _ = child.wait();

        let frame = frame.ok_or_else(|| {
            ClipMarkError::Decoder(format!(
                "no frame decoded from {} at {}",
                path.display(),
                at
            ))
        })?;
        debug!(path = %path.display(), %at, width = frame.width, height = frame.height, "Frame grabbed");
        to_frame_buffer(frame)
    }
}

/// Real-time (`-re`) decode from a start position, for on-screen preview.
pub struct PreviewStream {
    latest: Arc<Mutex<Option<FrameBuffer>>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl PreviewStream {
    pub fn start(path: &Path, from: RationalTime, max_width: u32) -> Result<Self> {
        let mut child = FfmpegCommand::new()
            .arg("-re")
            .seek(seek_arg(from))
            .input(path)
            .arg("-an")
            .args(["-vf", scale_filter(max_width).as_str()])
            .rawvideo()
            .spawn()
            .map_err(|e| ClipMarkError::Decoder(format!("failed to start ffmpeg: {e}")))?;
        let frames = child
            .iter()
            .map_err(|e| ClipMarkError::Decoder(e.to_string()))?;

        let latest = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let (w_latest, w_stop) = (Arc::clone(&latest), Arc::clone(&stop));
        let name = path.display().to_string();

        let worker = std::thread::Builder::new()
            .name("clipmark-preview".into())
            .spawn(move || {
                for frame in frames.filter_frames() {
                    if w_stop.load(Ordering::Relaxed) {
                        break;
                    }
                    match to_frame_buffer(frame) {
                        Ok(buffer) => {
                            *w_latest.lock() = Some(buffer);
                        }
                        Err(e) => {
                            warn!(source = %name, error = %e, "Dropping malformed preview frame");
                        }
                    }
                }
                if let Err(e) = child.quit() {
                    debug!(error = %e, "Preview decoder already exited");
                }
                let _ = child.wait();
                debug!(source = %name, "Preview stream ended");
            })
            .map_err(ClipMarkError::Io)?;

        debug!(path = %path.display(), %from, "Preview stream started");
        Ok(Self {
            latest,
            stop,
            worker: Some(worker),
        })
    }

    /// Most recent decoded frame.
    pub fn latest(&self) -> Option<FrameBuffer> {
        self.latest.lock().clone()
    }

    /// Ask the worker to stop after its current frame. Does not wait.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // The worker exits on its own; dropping the handle detaches it.
        self.worker.take();
    }
}

impl Drop for PreviewStream {
    fn drop(&mut self) {
        self.stop();
    }
}
