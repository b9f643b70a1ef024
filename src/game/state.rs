//! Session State Definitions
//!
//! The replicated lifecycle state for one match, plus its timing
//! configuration. Only the authoritative participant mutates these;
//! observers receive field updates and read derived values.

use serde::{Serialize, Deserialize};

use crate::core::countdown::Countdown;
use crate::core::screen::ScreenBounds;
use crate::game::player::PlayerId;

// =============================================================================
// SESSION PHASE
// =============================================================================

/// Lifecycle phase of a match.
///
/// Phases only ever advance, one step at a time. The discriminant order
/// backs the replica-side regression guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum SessionPhase {
    /// Pre-game countdown, ships not yet spawned
    #[default]
    Starting = 0,
    /// Active play
    Running = 1,
    /// Results screen, disconnect countdown
    Ending = 2,
}

impl SessionPhase {
    /// Next phase in the lifecycle (None after Ending).
    pub fn next(self) -> Option<SessionPhase> {
        match self {
            SessionPhase::Starting => Some(SessionPhase::Running),
            SessionPhase::Running => Some(SessionPhase::Ending),
            SessionPhase::Ending => None,
        }
    }
}

// =============================================================================
// SESSION CONFIG
// =============================================================================

/// Timing configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pre-game countdown before ships spawn (seconds).
    pub start_delay_secs: f32,
    /// Length of active play (seconds).
    pub session_length_secs: f32,
    /// Results screen duration before the session disconnects (seconds).
    pub end_delay_secs: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_delay_secs: 4.0,
            session_length_secs: 180.0,
            end_delay_secs: 4.0,
        }
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Replicated lifecycle state for one match.
///
/// The default value is what an observer holds before any update arrives:
/// Starting phase, unset timers, no winner, zero bounds. Every display
/// derived from it reads blank or zero.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Current lifecycle phase
    pub phase: SessionPhase,

    /// The single reused match timer: start delay, then session length,
    /// then end delay
    pub countdown: Countdown,

    /// Win checks are suppressed while this window runs
    pub grace: Countdown,

    /// Winning record, decided exactly once when play ends
    pub winner: Option<PlayerId>,

    /// Spawn-area half-extents derived from the camera at session start
    pub bounds: ScreenBounds,
}

impl SessionState {
    /// Create the pre-session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Is the match in active play? Gates hit detection and scoring.
    #[inline]
    pub fn game_is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }
}
