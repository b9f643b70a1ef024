//! Session Events
//!
//! Lifecycle events emitted by the authoritative tick. Spawners consume
//! `SpawningStarted`, the network runtime consumes `SessionClosed`, the
//! rest is informational for logs and overlays.

use serde::{Serialize, Deserialize};

use crate::game::player::PlayerId;
use crate::game::state::SessionPhase;

/// Session event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEventData {
    /// Play began; spawners may start placing ships and comets
    SpawningStarted,

    /// Lifecycle phase advanced
    PhaseChanged {
        /// Phase before the transition
        from: SessionPhase,
        /// Phase after the transition
        to: SessionPhase,
    },

    /// Winner decided (None means the roster was empty at the end)
    WinnerDecided {
        /// Winning record reference
        winner: Option<PlayerId>,
    },

    /// Results countdown ran out; the runtime should tear the match down
    SessionClosed,
}

/// A lifecycle event stamped with the session clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Session-clock seconds when the event fired
    pub at: f64,

    /// Event data
    pub data: SessionEventData,
}

impl SessionEvent {
    /// Create a new event.
    pub fn new(at: f64, data: SessionEventData) -> Self {
        Self { at, data }
    }

    /// Create a spawning started event.
    pub fn spawning_started(at: f64) -> Self {
        Self::new(at, SessionEventData::SpawningStarted)
    }

    /// Create a phase changed event.
    pub fn phase_changed(at: f64, from: SessionPhase, to: SessionPhase) -> Self {
        Self::new(at, SessionEventData::PhaseChanged { from, to })
    }

    /// Create a winner decided event.
    pub fn winner_decided(at: f64, winner: Option<PlayerId>) -> Self {
        Self::new(at, SessionEventData::WinnerDecided { winner })
    }

    /// Create a session closed event.
    pub fn session_closed(at: f64) -> Self {
        Self::new(at, SessionEventData::SessionClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_data() {
        let event = SessionEvent::phase_changed(2.5, SessionPhase::Starting, SessionPhase::Running);
        assert_eq!(event.at, 2.5);
        assert_eq!(
            event.data,
            SessionEventData::PhaseChanged {
                from: SessionPhase::Starting,
                to: SessionPhase::Running,
            }
        );

        let winner = PlayerId::new([4; 16]);
        let event = SessionEvent::winner_decided(90.0, Some(winner));
        assert_eq!(
            event.data,
            SessionEventData::WinnerDecided { winner: Some(winner) }
        );
    }
}
