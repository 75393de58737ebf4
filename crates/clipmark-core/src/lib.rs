//! ClipMark Core - Foundation types for the trim/caption editor
//!
//! This crate provides the fundamental types used throughout ClipMark:
//! - Time representation (RationalTime, TimeBound, FrameRate)
//! - RGBA frame rasters
//! - Caption overlays and their placement
//! - The status line

pub mod error;
pub mod frame;
pub mod overlay;
pub mod status;
pub mod time;

pub use error::{ClipMarkError, Result};
pub use frame::{FrameBuffer, BYTES_PER_PIXEL};
pub use overlay::{Overlay, OverlayPosition};
pub use status::{Status, StatusLine};
pub use time::{FrameRate, RationalTime, TimeBound};
