//! Caption overlay entity.
//!
//! The vertical placement is stored on the overlay itself; both the live
//! preview and still captures derive their position from it.

use crate::error::ClipMarkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vertical placement tag of a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPosition {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl OverlayPosition {
    pub const ALL: [Self; 3] = [Self::Top, Self::Middle, Self::Bottom];

    /// Fraction of the frame height at which the caption is drawn.
    pub fn placement_ratio(self) -> f32 {
        match self {
            Self::Top => 0.15,
            Self::Middle => 0.50,
            Self::Bottom => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlayPosition {
    type Err = ClipMarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            other => Err(ClipMarkError::InvalidParameter(format!(
                "unknown overlay position '{other}'"
            ))),
        }
    }
}

/// A single text caption with its placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    text: String,
    position: OverlayPosition,
}

impl Overlay {
    /// Build a caption from raw input. Blank text yields `None`.
    pub fn new(text: &str, position: OverlayPosition) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            position,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> OverlayPosition {
        self.position
    }

    /// Baseline y coordinate for a frame of the given height.
    pub fn baseline_y(&self, frame_height: u32) -> f32 {
        frame_height as f32 * self.position.placement_ratio()
    }
}
