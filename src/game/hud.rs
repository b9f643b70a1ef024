//! HUD Derivation
//!
//! Derived display state, recomputed by every participant on every render
//! tick from the replicated session state. Nothing here is stored or
//! replicated; disagreement between participants is only ever clock skew.

use crate::core::color::PlayerColor;
use crate::game::player::PlayerDirectory;
use crate::game::state::{SessionState, SessionPhase};

/// What the session HUD shows this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum HudView {
    /// Nothing session-related on screen
    Hidden,

    /// Pre-game countdown in whole seconds
    StartCountdown {
        /// Rounded seconds until ships spawn
        seconds: u32,
    },

    /// Match clock plus connection readout
    SessionClock {
        /// Zero-padded three-digit remaining seconds
        clock: String,
        /// Local round-trip estimate, milliseconds
        rtt_ms: u32,
    },

    /// Winner banner in the winner's color
    WinnerBanner {
        /// Full banner text
        message: String,
        /// Color derived from the winning connection
        color: PlayerColor,
    },
}

/// Derive the HUD for this render tick.
///
/// Host and observers call this with the same state and the same `now`
/// and get the same answer; `rtt_ms` is the one participant-local
/// input.
pub fn derive_hud(
    state: &SessionState,
    directory: &dyn PlayerDirectory,
    now: f64,
    rtt_ms: u32,
) -> HudView {
    match state.phase {
        SessionPhase::Starting => HudView::StartCountdown {
            seconds: state.countdown.display_seconds(now),
        },
        SessionPhase::Running => HudView::SessionClock {
            clock: format!("{:03}", state.countdown.display_seconds(now)),
            rtt_ms,
        },
        SessionPhase::Ending => {
            // The winner's record can be momentarily unresolvable while its
            // owner tears down. Stay hidden this tick and retry on the next.
            match state.winner.and_then(|id| directory.record(&id)) {
                Some(record) => HudView::WinnerBanner {
                    message: format!(
                        "{} won with {} points, disconnecting in {}",
                        record.nickname,
                        record.score,
                        state.countdown.display_seconds(now),
                    ),
                    color: record.owner.color(),
                },
                None => HudView::Hidden,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::countdown::Countdown;
    use crate::game::player::{ClientId, MemoryDirectory, PlayerId, PlayerRecord};

    #[test]
    fn test_starting_shows_rounded_seconds() {
        let mut state = SessionState::new();
        let directory = MemoryDirectory::new();

        // Unset countdown renders 0, never negative
        assert_eq!(
            derive_hud(&state, &directory, 50.0, 0),
            HudView::StartCountdown { seconds: 0 }
        );

        state.countdown = Countdown::started(0.0, 4.0);
        assert_eq!(
            derive_hud(&state, &directory, 1.4, 0),
            HudView::StartCountdown { seconds: 3 }
        );
    }

    #[test]
    fn test_running_clock_is_zero_padded() {
        let mut state = SessionState::new();
        state.phase = SessionPhase::Running;
        state.countdown = Countdown::started(0.0, 180.0);
        let directory = MemoryDirectory::new();

        assert_eq!(
            derive_hud(&state, &directory, 0.0, 23),
            HudView::SessionClock { clock: "180".into(), rtt_ms: 23 }
        );
        assert_eq!(
            derive_hud(&state, &directory, 143.0, 23),
            HudView::SessionClock { clock: "037".into(), rtt_ms: 23 }
        );
    }

    #[test]
    fn test_ending_unresolvable_winner_hides() {
        let mut state = SessionState::new();
        state.phase = SessionPhase::Ending;
        state.winner = Some(PlayerId::new([9; 16]));
        state.countdown = Countdown::started(0.0, 4.0);
        let directory = MemoryDirectory::new();

        // Nobody can resolve the record right now
        assert_eq!(derive_hud(&state, &directory, 1.0, 0), HudView::Hidden);

        // No winner at all (empty roster at the end) also hides
        state.winner = None;
        assert_eq!(derive_hud(&state, &directory, 1.0, 0), HudView::Hidden);
    }

    #[test]
    fn test_winner_banner_text_and_color() {
        let winner_id = PlayerId::new([2; 16]);
        let owner = ClientId::new(7);
        let mut record = PlayerRecord::new(winner_id, owner, "Nova", 1);
        record.score = 120;

        let mut directory = MemoryDirectory::new();
        directory.insert(record);

        let mut state = SessionState::new();
        state.phase = SessionPhase::Ending;
        state.winner = Some(winner_id);
        state.countdown = Countdown::started(10.0, 4.0);

        // Remaining 3.6s rounds up to 4
        assert_eq!(
            derive_hud(&state, &directory, 10.4, 55),
            HudView::WinnerBanner {
                message: "Nova won with 120 points, disconnecting in 4".into(),
                color: owner.color(),
            }
        );
    }
}
