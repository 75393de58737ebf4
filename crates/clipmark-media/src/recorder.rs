//! Real-time clip recorder.
//!
//! Each capture session runs one ffmpeg process that plays the source from
//! the trim start at native rate (`-re`) and muxes WebM to stdout. A reader
//! thread forwards stdout as `DataAvailable` fragments and reports
//! `RecorderStopped` at end of stream. Stopping sends ffmpeg `q`, which
//! finalizes the container before exit.

use clipmark_core::{ClipMarkError, Result};
use clipmark_editor::{CaptureRequest, CaptureTap, EditorEvent, SessionId};
use crossbeam_channel::Sender;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Size of the stdout reads forwarded as fragments.
pub const FRAGMENT_BYTES: usize = 64 * 1024;

// ── Format presets ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCodec {
    Vp8,
    Vp9,
}

impl VideoCodec {
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::Vp8 => "libvpx",
            Self::Vp9 => "libvpx-vp9",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCodec {
    Opus,
    Vorbis,
}

impl AudioCodec {
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::Opus => "libopus",
            Self::Vorbis => "libvorbis",
        }
    }
}

/// Encoding settings for a recorded clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipFormat {
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    /// Constant quality (0-63, lower = better).
    pub crf: u32,
    /// Audio bitrate in kbps.
    pub audio_bitrate: u32,
    /// libvpx speed setting; higher is faster.
    pub cpu_used: u32,
    /// ffmpeg muxer name.
    pub container: String,
}

impl ClipFormat {
    /// VP9/Opus WebM tuned for encoding at playback speed.
    pub fn webm() -> Self {
        Self {
            video_codec: VideoCodec::Vp9,
            audio_codec: AudioCodec::Opus,
            crf: 32,
            audio_bitrate: 128,
            cpu_used: 8,
            container: "webm".into(),
        }
    }

    /// ffmpeg arguments for one capture, after the binary name.
    pub fn capture_args(&self, request: &CaptureRequest) -> Vec<OsString> {
        vec![
            "-hide_banner".into(),
            "-nostats".into(),
            "-loglevel".into(),
            "error".into(),
            "-re".into(),
            "-ss".into(),
            format!("{:.3}", request.start.to_seconds_f64().max(0.0)).into(),
            "-i".into(),
            request.source.clone().into_os_string(),
            "-map".into(),
            "0:v:0".into(),
            "-map".into(),
            "0:a:0?".into(),
            "-c:v".into(),
            self.video_codec.ffmpeg_encoder().into(),
            "-deadline".into(),
            "realtime".into(),
            "-cpu-used".into(),
            self.cpu_used.to_string().into(),
            "-crf".into(),
            self.crf.to_string().into(),
            "-b:v".into(),
            "0".into(),
            "-c:a".into(),
            self.audio_codec.ffmpeg_encoder().into(),
            "-b:a".into(),
            format!("{}k", self.audio_bitrate).into(),
            "-f".into(),
            self.container.clone().into(),
            "pipe:1".into(),
        ]
    }
}

impl Default for ClipFormat {
    fn default() -> Self {
        Self::webm()
    }
}

// ── Recorder ─────────────────────────────────────────────────────

type Running = Arc<Mutex<HashMap<SessionId, FfmpegChild>>>;

/// `CaptureTap` over ffmpeg processes, one per session.
pub struct FfmpegRecorder {
    format: ClipFormat,
    events: Sender<EditorEvent>,
    running: Running,
}

impl FfmpegRecorder {
    pub fn new(format: ClipFormat, events: Sender<EditorEvent>) -> Self {
        Self {
            format,
            events,
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl CaptureTap for FfmpegRecorder {
    fn open(&mut self, request: &CaptureRequest) -> Result<()> {
        let mut child = FfmpegCommand::new()
            .args(self.format.capture_args(request))
            .spawn()
            .map_err(|e| ClipMarkError::Encoder(format!("failed to start ffmpeg: {e}")))?;
        let stdout = child
            .take_stdout()
            .ok_or_else(|| ClipMarkError::Encoder("ffmpeg stdout not captured".into()))?;

        let session = request.session;
        self.running.lock().insert(session, child);

        let events = self.events.clone();
        let running = Arc::clone(&self.running);
        std::thread::Builder::new()
            .name(format!("clipmark-recorder-{}", session.raw()))
            .spawn(move || forward_output(session, stdout, &events, &running))
            .map_err(ClipMarkError::Io)?;

        info!(
            %session,
            source = %request.source.display(),
            start = %request.start,
            "Recorder opened"
        );
        Ok(())
    }

    fn stop(&mut self, session: SessionId) {
        match self.running.lock().get_mut(&session) {
            Some(child) => {
                if let Err(e) = child.quit() {
                    warn!(%session, error = %e, "Recorder quit failed");
                }
                debug!(%session, "Recorder stop requested");
            }
            None => debug!(%session, "Stop for unknown recorder session"),
        }
    }
}

fn forward_output(
    session: SessionId,
    mut stdout: impl Read,
    events: &Sender<EditorEvent>,
    running: &Running,
) {
    let mut buf = vec![0u8; FRAGMENT_BYTES];
    let mut read_error = None;
    loop {
        match stdout.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let event = EditorEvent::DataAvailable {
                    session,
                    bytes: buf[..n].to_vec(),
                };
                if events.send(event).is_err() {
                    debug!(%session, "Editor gone, dropping recorder output");
                    break;
                }
            }
            Err(e) => {
                read_error = Some(e.to_string());
                break;
            }
        }
    }

    let child = running.lock().remove(&session);
    let status = child.map(|mut child| child.wait());
    let event = match (read_error, status) {
        (Some(message), _) => EditorEvent::RecorderFailed { session, message },
        (None, Some(Err(e))) => EditorEvent::RecorderFailed {
            session,
            message: e.to_string(),
        },
        (None, Some(Ok(status))) if !status.success() => EditorEvent::RecorderFailed {
            session,
            message: format!("ffmpeg exited with {status}"),
        },
        (None, _) => EditorEvent::RecorderStopped(session),
    };
    debug!(%session, ?event, "Recorder finished");
    let _ = events.send(event);
}
