//! Wall-clock playback position.
//!
//! Media time advances one second per wall-clock second while playing.
//! Non-looping clocks stop at the duration; looping clocks wrap.

use clipmark_core::RationalTime;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Position at `anchor`, or the frozen position while paused.
    base: RationalTime,
    anchor: Option<Instant>,
    duration: Option<RationalTime>,
    looping: bool,
}

impl PlaybackClock {
    pub fn new(duration: Option<RationalTime>) -> Self {
        Self {
            base: RationalTime::ZERO,
            anchor: None,
            duration: duration.filter(|d| !d.is_zero() && !d.is_negative()),
            looping: false,
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn duration(&self) -> Option<RationalTime> {
        self.duration
    }

    pub fn is_paused(&self) -> bool {
        self.anchor.is_none()
    }

    pub fn play(&mut self) {
        self.play_at(Instant::now());
    }

    pub fn play_at(&mut self, now: Instant) {
        if self.anchor.is_none() {
            if self.has_ended_at(now) {
                self.base = RationalTime::ZERO;
            }
            self.anchor = Some(now);
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.anchor.is_some() {
            self.base = self.position_at(now);
            self.anchor = None;
        }
    }

    /// Move the play-head, keeping the playing state.
    pub fn seek(&mut self, position: RationalTime) {
        self.seek_at(position, Instant::now());
    }

    pub fn seek_at(&mut self, position: RationalTime, now: Instant) {
        self.base = self.clamp(if position.is_negative() {
            RationalTime::ZERO
        } else {
            position
        });
        if self.anchor.is_some() {
            self.anchor = Some(now);
        }
    }

    pub fn position(&self) -> RationalTime {
        self.position_at(Instant::now())
    }

    pub fn position_at(&self, now: Instant) -> RationalTime {
        let Some(anchor) = self.anchor else {
            return self.base;
        };
        let elapsed = RationalTime::from_duration(now.saturating_duration_since(anchor));
        self.clamp(self.base + elapsed)
    }

    /// A non-looping clock that has run to its duration.
    pub fn has_ended(&self) -> bool {
        self.has_ended_at(Instant::now())
    }

    pub fn has_ended_at(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) if !self.looping => self.position_at(now) >= duration,
            _ => false,
        }
    }

    fn clamp(&self, position: RationalTime) -> RationalTime {
        match self.duration {
            Some(duration) if self.looping && position >= duration => {
                let secs = position.to_seconds_f64() % duration.to_seconds_f64();
                RationalTime::from_seconds_f64(secs)
            }
            Some(duration) if position > duration => duration,
            _ => position,
        }
    }
}
