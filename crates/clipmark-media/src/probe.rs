//! Media file probing via ffprobe JSON output.

use clipmark_core::{ClipMarkError, FrameRate, RationalTime, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    pub path: PathBuf,
    /// Container duration, when the container reports one.
    pub duration: Option<RationalTime>,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container format name as reported by ffprobe (e.g. "mov,mp4,m4a").
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub pixel_format: String,
    pub bit_rate: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_rate: Option<u64>,
}

// ── ffprobe JSON shape ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

/// Path of the ffprobe binary that ships next to ffmpeg.
pub fn ffprobe_path() -> PathBuf {
    let name = if cfg!(windows) { "ffprobe.exe" } else { "ffprobe" };
    ffmpeg_sidecar::paths::ffmpeg_path().with_file_name(name)
}

impl MediaProbe {
    /// Probe a media file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClipMarkError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let output = Command::new(ffprobe_path())
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ClipMarkError::Media(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipMarkError::Media(format!(
                "ffprobe rejected {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let probe = Self::from_json(path, &output.stdout)?;
        debug!(
            path = %path.display(),
            duration = ?probe.duration,
            video = probe.video_streams.len(),
            audio = probe.audio_streams.len(),
            "Probed media"
        );
        Ok(probe)
    }

    /// Build a probe from ffprobe's JSON document.
    pub fn from_json(path: &Path, json: &[u8]) -> Result<Self> {
        let raw: ProbeOutput = serde_json::from_slice(json)
            .map_err(|e| ClipMarkError::Serialization(format!("ffprobe output: {e}")))?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        for stream in raw.streams {
            let codec = stream.codec_name.clone().unwrap_or_default();
            let bit_rate = stream.bit_rate.as_deref().and_then(|b| b.parse().ok());
            match stream.codec_type.as_deref() {
                Some("video") => {
                    let (Some(width), Some(height)) = (stream.width, stream.height) else {
                        continue;
                    };
                    let frame_rate = stream
                        .avg_frame_rate
                        .as_deref()
                        .and_then(FrameRate::parse)
                        .or_else(|| stream.r_frame_rate.as_deref().and_then(FrameRate::parse))
                        .unwrap_or_default();
                    video_streams.push(VideoStreamInfo {
                        index: stream.index,
                        codec,
                        width,
                        height,
                        frame_rate,
                        pixel_format: stream.pix_fmt.unwrap_or_default(),
                        bit_rate,
                    });
                }
                Some("audio") => audio_streams.push(AudioStreamInfo {
                    index: stream.index,
                    codec,
                    sample_rate: stream
                        .sample_rate
                        .as_deref()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                    bit_rate,
                }),
                _ => {}
            }
        }

        let (format, duration) = match raw.format {
            Some(f) => (
                f.format_name.unwrap_or_default(),
                f.duration.as_deref().and_then(RationalTime::parse_seconds),
            ),
            None => (String::new(), None),
        };

        Ok(Self {
            path: path.to_path_buf(),
            duration: duration.filter(|d| !d.is_negative() && !d.is_zero()),
            video_streams,
            audio_streams,
            format,
        })
    }

    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }
}
