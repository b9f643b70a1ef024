//! Replicated Countdown Timer
//!
//! A duration plus an optional start instant on the shared session clock.
//! Queries never block or mutate; expiry is checked against a caller-supplied
//! `now` so host and observers read the same timer identically.

use serde::{Serialize, Deserialize};

/// Countdown timer over the shared session clock.
///
/// An unset timer (never started) reads as not running, not expired,
/// and displays as 0.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Countdown {
    /// Total duration in seconds.
    duration_secs: f32,

    /// Session-clock instant the timer was started (None = unset).
    started_at: Option<f64>,
}

impl Countdown {
    /// An unset timer.
    pub const fn unset() -> Self {
        Self {
            duration_secs: 0.0,
            started_at: None,
        }
    }

    /// Create a timer already running from `now`.
    pub fn started(now: f64, duration_secs: f32) -> Self {
        Self {
            duration_secs,
            started_at: Some(now),
        }
    }

    /// Restart from `now` with a new duration.
    pub fn restart(&mut self, now: f64, duration_secs: f32) {
        self.duration_secs = duration_secs;
        self.started_at = Some(now);
    }

    /// Has this timer ever been started?
    #[inline]
    pub fn is_set(&self) -> bool {
        self.started_at.is_some()
    }

    /// Configured duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    /// Seconds left before expiry. 0.0 when unset or already expired.
    pub fn remaining_secs(&self, now: f64) -> f32 {
        match self.started_at {
            Some(started_at) => {
                let elapsed = now - started_at;
                (self.duration_secs as f64 - elapsed).max(0.0) as f32
            }
            None => 0.0,
        }
    }

    /// Has the timer been started and run out? Unset timers never expire.
    pub fn is_expired(&self, now: f64) -> bool {
        match self.started_at {
            Some(started_at) => now - started_at >= self.duration_secs as f64,
            None => false,
        }
    }

    /// Is the timer started and still counting down?
    #[inline]
    pub fn is_running(&self, now: f64) -> bool {
        self.is_set() && !self.is_expired(now)
    }

    /// Remaining seconds rounded to the nearest integer, 0 when unset.
    ///
    /// This is the only form displays should render; it can never go
    /// negative.
    #[inline]
    pub fn display_seconds(&self, now: f64) -> u32 {
        self.remaining_secs(now).round() as u32
    }
}
