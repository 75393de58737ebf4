//! ClipMark - trim, caption, screenshot and export short clips
//!
//! Entry point and main application loop.

mod app;
mod config;
mod panels;
mod preview;

use anyhow::Result;
use app::ClipMarkApp;
use config::AppConfig;
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let config_path = AppConfig::default_path();
    let loaded = match config_path.as_deref() {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("ClipMark starting...");
    match (&loaded, &config_path) {
        (Ok(_), Some(path)) => info!(path = %path.display(), "Configuration loaded"),
        (Ok(_), None) => info!("No config directory, using defaults"),
        (Err(e), _) => warn!(error = %e, "Ignoring unreadable configuration"),
    }

    if !clipmark_media::init() {
        warn!("Video, screenshot and export actions will fail until ffmpeg is installed");
    }

    let video_path = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("ClipMark"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "ClipMark",
        options,
        Box::new(move |cc| Ok(Box::new(ClipMarkApp::new(cc, config, video_path)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}
