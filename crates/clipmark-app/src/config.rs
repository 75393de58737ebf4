//! Application settings with a versioned JSON file.

use clipmark_core::{ClipMarkError, Result};
use clipmark_editor::AudioSyncPolicy;
use clipmark_media::{CAPTION_FONT_PX, DEFAULT_PREVIEW_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

const CONFIG_DIR: &str = "clipmark";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where screenshots and exported clips are written.
    pub output_dir: PathBuf,
    /// Caption font; system sans-serif fonts are tried when unset.
    pub font_path: Option<PathBuf>,
    pub caption_font_px: f32,
    /// Maximum width of decoded preview frames.
    pub preview_width: u32,
    pub audio_sync: AudioSyncPolicy,
    /// Play-head update period while playing.
    pub time_update_interval_ms: u64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs::download_dir()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from(".")),
            font_path: None,
            caption_font_px: CAPTION_FONT_PX,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            audio_sync: AudioSyncPolicy::default(),
            time_update_interval_ms: 33,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/clipmark/config.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read(path)?;
        Ok(ConfigFile::from_json(&data)?.config)
    }

    pub fn time_update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.time_update_interval_ms.clamp(5, 1000))
    }
}

/// Versioned wrapper on disk.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub config: AppConfig,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ConfigFile {
    /// Parse, migrating older layouts first.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ClipMarkError::Serialization(format!("Invalid JSON: {e}")))?;
        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        if version > CURRENT_VERSION {
            return Err(ClipMarkError::Serialization(format!(
                "Config version {version} is newer than supported version {CURRENT_VERSION}"
            )));
        }
        serde_json::from_value(migrate(raw, version)?)
            .map_err(|e| ClipMarkError::Serialization(format!("Failed to parse config: {e}")))
    }
}

fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;
    while version < CURRENT_VERSION {
        match version {
            // v0: the settings object itself, unwrapped.
            0 => {
                data = serde_json::json!({
                    "version": 1,
                    "config": data,
                    "app_version": "0.0.0",
                });
                version = 1;
            }
            _ => {
                return Err(ClipMarkError::Serialization(format!(
                    "No migration path from config version {version}"
                )));
            }
        }
    }
    Ok(data)
}
