//! Time representation for trim windows and playback positions
//!
//! Uses rational numbers to avoid floating-point accumulation errors.
//! All time values are represented as numerator/denominator pairs of seconds.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Precision used when converting from floating-point seconds (microseconds).
const PRECISION: i64 = 1_000_000;

/// A rational time value representing a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

impl RationalTime {
    /// Create a new RationalTime from numerator and denominator.
    /// The time is `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_seconds(seconds: i64) -> Self {
        Self::new(seconds, 1)
    }

    /// Create a RationalTime from seconds as a float.
    /// Note: rounds to microsecond precision; non-finite input maps to zero.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::ZERO;
        }
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Parse a user-entered number of seconds.
    ///
    /// Returns `None` for empty, unparsable or non-finite input.
    pub fn parse_seconds(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let seconds: f64 = trimmed.parse().ok()?;
        seconds.is_finite().then(|| Self::from_seconds_f64(seconds))
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Convert to a wall-clock duration; negative times clamp to zero.
    pub fn to_duration(self) -> Duration {
        if self.is_negative() {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.to_seconds_f64())
    }

    /// Convert from a wall-clock duration.
    pub fn from_duration(duration: Duration) -> Self {
        Self::new(duration.as_micros() as i64, PRECISION)
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            Self { value: -self.value }
        } else {
            self
        }
    }

    /// Seconds formatted without trailing zeros ("2", "2.5").
    pub fn compact(self) -> String {
        if self.value.is_integer() {
            return self.value.to_integer().to_string();
        }
        let text = format!("{:.3}", self.to_seconds_f64());
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Upper bound of a time interval: a finite time or no bound at all.
///
/// Every finite time orders below `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBound {
    Finite(RationalTime),
    Unbounded,
}

impl TimeBound {
    /// The finite time, if any.
    pub fn finite(self) -> Option<RationalTime> {
        match self {
            Self::Finite(time) => Some(time),
            Self::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Whether `time` lies at or beyond this bound.
    pub fn reached_by(self, time: RationalTime) -> bool {
        match self {
            Self::Finite(end) => time >= end,
            Self::Unbounded => false,
        }
    }

    /// Seconds formatted without trailing zeros, "∞" when unbounded.
    pub fn compact(self) -> String {
        match self {
            Self::Finite(time) => time.compact(),
            Self::Unbounded => "∞".to_string(),
        }
    }
}

impl From<RationalTime> for TimeBound {
    fn from(time: RationalTime) -> Self {
        Self::Finite(time)
    }
}

impl From<Option<RationalTime>> for TimeBound {
    fn from(time: Option<RationalTime>) -> Self {
        time.map_or(Self::Unbounded, Self::Finite)
    }
}

impl PartialEq<RationalTime> for TimeBound {
    fn eq(&self, other: &RationalTime) -> bool {
        *self == Self::Finite(*other)
    }
}

impl PartialOrd<TimeBound> for RationalTime {
    fn partial_cmp(&self, other: &TimeBound) -> Option<std::cmp::Ordering> {
        TimeBound::Finite(*self).partial_cmp(other)
    }
}

impl PartialEq<TimeBound> for RationalTime {
    fn eq(&self, other: &TimeBound) -> bool {
        TimeBound::Finite(*self) == *other
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(time) => time.fmt(f),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Parse an ffprobe rate string such as `"30000/1001"` or `"25"`.
    ///
    /// Zero rates (`"0/0"`, reported for still images) yield `None`.
    pub fn parse(rate: &str) -> Option<Self> {
        let (num, den): (u32, u32) = match rate.split_once('/') {
            Some((num, den)) => (num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => (rate.trim().parse().ok()?, 1),
        };
        (num > 0 && den > 0).then(|| Self::new(num, den))
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
