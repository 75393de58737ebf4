//! Trim window: the half-open `[start, end)` interval previewed and exported.

use clipmark_core::{ClipMarkError, RationalTime, Result, TimeBound};
use serde::{Deserialize, Serialize};

/// Half-open time interval of the primary media.
///
/// `start < end` always holds; the default window is `[0, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimWindow {
    start: RationalTime,
    end: TimeBound,
}

impl TrimWindow {
    /// The untrimmed window `[0, ∞)`.
    pub const FULL: Self = Self {
        start: RationalTime::ZERO,
        end: TimeBound::Unbounded,
    };

    /// Create a window, rejecting `start >= end` and negative starts.
    pub fn new(start: RationalTime, end: impl Into<TimeBound>) -> Result<Self> {
        let end = end.into();
        if start.is_negative() || start >= end {
            return Err(ClipMarkError::InvalidTrim { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a window from the two text inputs.
    ///
    /// An empty, unparsable or negative start defaults to 0. An empty,
    /// unparsable or non-positive end defaults to the media duration, or to
    /// no bound when the duration is unknown.
    pub fn from_inputs(
        start_text: &str,
        end_text: &str,
        media_duration: Option<RationalTime>,
    ) -> Result<Self> {
        let start = RationalTime::parse_seconds(start_text)
            .filter(|t| !t.is_negative())
            .unwrap_or(RationalTime::ZERO);
        let positive = |t: &RationalTime| !t.is_negative() && !t.is_zero();
        let end = RationalTime::parse_seconds(end_text)
            .filter(positive)
            .or_else(|| media_duration.filter(positive));
        Self::new(start, end)
    }

    pub fn start(&self) -> RationalTime {
        self.start
    }

    pub fn end(&self) -> TimeBound {
        self.end
    }

    /// Whether the play-head has reached or passed the end of the window.
    pub fn reached_end(&self, position: RationalTime) -> bool {
        self.end.reached_by(position)
    }

    pub fn contains(&self, position: RationalTime) -> bool {
        position >= self.start && !self.reached_end(position)
    }

    /// Window length, `None` when unbounded.
    pub fn duration(&self) -> Option<RationalTime> {
        self.end.finite().map(|end| end - self.start)
    }

    /// Length of a capture over this window, `max(0, end - start)`.
    ///
    /// An unbounded window is closed at `media_duration` when known.
    pub fn capture_length(&self, media_duration: Option<RationalTime>) -> Option<RationalTime> {
        let end = self.end.finite().or(media_duration)?;
        let length = end - self.start;
        Some(if length.is_negative() {
            RationalTime::ZERO
        } else {
            length
        })
    }
}

impl Default for TrimWindow {
    fn default() -> Self {
        Self::FULL
    }
}
