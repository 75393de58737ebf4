//! PCM feed: an ffmpeg process decoding a file to interleaved f32 samples,
//! pumped into a [`RingBuffer`] on a worker thread.

use crate::ring_buffer::RingBuffer;
use clipmark_core::{ClipMarkError, Result};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

const READ_CHUNK_BYTES: usize = 16 * 1024;
const FULL_BACKOFF: Duration = Duration::from_millis(5);

/// What to decode and how.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    /// Restart from the beginning at end of stream, forever.
    pub looping: bool,
    /// Seconds into the file where decoding begins.
    pub start_seconds: f64,
}

impl FeedConfig {
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32, channels: u16) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            channels,
            looping: false,
            start_seconds: 0.0,
        }
    }

    pub fn starting_at(mut self, seconds: f64) -> Self {
        self.start_seconds = seconds.max(0.0);
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// ffmpeg arguments producing raw little-endian f32 on stdout.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
        if self.looping {
            args.extend(["-stream_loop", "-1"].map(OsString::from));
        }
        if self.start_seconds > 0.0 {
            args.push("-ss".into());
            args.push(format!("{:.3}", self.start_seconds).into());
        }
        args.append(&mut vec![
            "-i".into(),
            self.path.clone().into_os_string(),
            "-vn".into(),
            "-ac".into(),
            self.channels.to_string().into(),
            "-ar".into(),
            self.sample_rate.to_string().into(),
            "-f".into(),
            "f32le".into(),
            "-acodec".into(),
            "pcm_f32le".into(),
            "pipe:1".into(),
        ]);
        args
    }
}

/// A running decode. Dropping it stops the process and joins the worker.
pub struct PcmFeed {
    stop: Arc<AtomicBool>,
    child: Child,
    worker: Option<JoinHandle<()>>,
}

impl PcmFeed {
    pub fn start(config: &FeedConfig, ffmpeg: &Path, sink: Arc<RingBuffer>) -> Result<Self> {
        let mut child = Command::new(ffmpeg)
            .args(config.ffmpeg_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipMarkError::Audio(format!("failed to start ffmpeg: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipMarkError::Internal("ffmpeg stdout not captured".into()))?;

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let name = config.path.display().to_string();
        let worker = std::thread::Builder::new()
            .name("clipmark-pcm-feed".into())
            .spawn(move || pump(stdout, &sink, &worker_stop, &name))
            .map_err(ClipMarkError::Io)?;

        debug!(path = %config.path.display(), looping = config.looping, "PCM feed started");
        Ok(Self {
            stop,
            child,
            worker: Some(worker),
        })
    }

    /// Whether the worker is still producing.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl Drop for PcmFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "ffmpeg already exited");
        }
        let _ = self.child.wait();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn pump(mut source: impl Read, sink: &RingBuffer, stop: &AtomicBool, name: &str) {
    let mut bytes = vec![0u8; READ_CHUNK_BYTES];
    let mut carry: Vec<u8> = Vec::with_capacity(4);
    let mut samples: Vec<f32> = Vec::with_capacity(READ_CHUNK_BYTES / 4 + 1);

    while !stop.load(Ordering::Relaxed) {
        let n = match source.read(&mut bytes) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(source = name, error = %e, "PCM read failed");
                break;
            }
        };
        carry.extend_from_slice(&bytes[..n]);
        let whole = carry.len() / 4 * 4;
        samples.clear();
        samples.extend(
            carry[..whole]
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
        carry.drain(..whole);

        let mut offset = 0;
        while offset < samples.len() {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            let pushed = sink.push(&samples[offset..]);
            if pushed == 0 {
                std::thread::sleep(FULL_BACKOFF);
            }
            offset += pushed;
        }
    }
    debug!(source = name, "PCM feed finished");
}
