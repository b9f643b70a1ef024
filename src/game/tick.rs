//! Authoritative Session Tick
//!
//! Phase advancement and win evaluation, run once per render tick by the
//! authoritative participant only. Pure over its inputs: the session clock,
//! the connected-participant count, and the player directory all come from
//! the caller, so the logic is testable without a network runtime.

use tracing::{info, debug, warn};

use crate::GRACE_WINDOW_SECS;
use crate::game::events::SessionEvent;
use crate::game::player::{PlayerDirectory, Roster};
use crate::game::state::{SessionState, SessionPhase, SessionConfig};

/// Result of an authoritative tick.
#[derive(Debug)]
#[derive(Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<SessionEvent>,
    /// Whether the network runtime should tear the session down now
    pub session_over: bool,
}

/// Run one authoritative tick.
///
/// # Arguments
///
/// * `state` - Replicated session state (will be mutated)
/// * `roster` - Tracked player references (pruned lazily)
/// * `directory` - Player record lookup
/// * `now` - Shared session clock, seconds
/// * `connected_count` - Currently connected participants
/// * `config` - Session timing configuration
///
/// Observers never call this; they only apply replicated field updates.
pub fn tick(
    state: &mut SessionState,
    roster: &mut Roster,
    directory: &dyn PlayerDirectory,
    now: f64,
    connected_count: usize,
    config: &SessionConfig,
) -> TickResult {
    let mut result = TickResult::default();

    match state.phase {
        SessionPhase::Starting => {
            if state.countdown.is_expired(now) {
                begin_play(state, now, config, &mut result);
            }
        }
        SessionPhase::Running => {
            evaluate_win_condition(
                state,
                roster,
                directory,
                now,
                connected_count,
                config,
                &mut result,
            );
        }
        SessionPhase::Ending => {
            if state.countdown.is_expired(now) {
                info!("results countdown expired at {:.2}s, closing session", now);
                result.events.push(SessionEvent::session_closed(now));
                result.session_over = true;
            }
        }
    }

    result
}

/// Step to the successor phase and record the transition.
///
/// Ending has no successor; both callers sit in an arm whose phase
/// still has one.
fn advance_phase(state: &mut SessionState, now: f64, result: &mut TickResult) {
    let from = state.phase;
    if let Some(to) = from.next() {
        state.phase = to;
        result.events.push(SessionEvent::phase_changed(now, from, to));
    }
}

/// Start countdown ran out: open play and arm the match timers.
fn begin_play(
    state: &mut SessionState,
    now: f64,
    config: &SessionConfig,
    result: &mut TickResult,
) {
    // Spawners hold fire until they see this
    result.events.push(SessionEvent::spawning_started(now));

    advance_phase(state, now, result);
    state.countdown.restart(now, config.session_length_secs);
    state.grace.restart(now, GRACE_WINDOW_SECS);

    info!(
        "play opened at {:.2}s, session length {}s",
        now, config.session_length_secs
    );
}

/// Decide whether play ends this tick.
///
/// Check order matters: time-up ends the match even when several ships
/// are alive, and an open grace window suppresses everything below it.
fn evaluate_win_condition(
    state: &mut SessionState,
    roster: &mut Roster,
    directory: &dyn PlayerDirectory,
    now: f64,
    connected_count: usize,
    config: &SessionConfig,
    result: &mut TickResult,
) {
    // Time up (or timer never armed): end regardless of who is alive
    if !state.countdown.is_running(now) {
        end_play(state, roster, directory, now, config, result);
        return;
    }

    // Fresh spawns get breathing room before eliminations can end the match
    if state.grace.is_running(now) {
        return;
    }

    // Prune references whose owners are gone, count live ships among the rest
    let mut players_alive = 0usize;
    roster.retain(|id| match directory.record(id) {
        Some(record) => {
            if record.is_alive() {
                players_alive += 1;
            }
            true
        }
        None => {
            debug!("dropping unresolvable player record {}", id.to_uuid_string());
            false
        }
    });

    // Still contested, or a lone ship practicing on an empty server
    if players_alive > 1 || (players_alive == 1 && connected_count == 1) {
        return;
    }

    end_play(state, roster, directory, now, config, result);
}

/// Close play: pick the winner, arm the results countdown, advance phase.
///
/// Only reachable while Running, so the winner is written exactly once
/// per session.
fn end_play(
    state: &mut SessionState,
    roster: &Roster,
    directory: &dyn PlayerDirectory,
    now: f64,
    config: &SessionConfig,
    result: &mut TickResult,
) {
    // Last live ship in tracking order wins; later entries overwrite earlier
    let mut winner = None;
    for id in roster.iter() {
        if directory.record(id).is_some_and(|r| r.is_alive()) {
            winner = Some(*id);
        }
    }

    // Nobody alive (a lone ship burned its last life): credit the first
    // tracked record instead of ending winnerless
    let winner = winner.or_else(|| roster.first().copied());

    state.winner = winner;
    state.countdown.restart(now, config.end_delay_secs);

    match winner {
        Some(id) => info!("play ended at {:.2}s, winner {}", now, id.to_uuid_string()),
        None => warn!("play ended at {:.2}s with an empty roster, no winner", now),
    }

    result.events.push(SessionEvent::winner_decided(now, winner));
    advance_phase(state, now, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::core::countdown::Countdown;
    use crate::game::events::SessionEventData;
    use crate::game::player::{ClientId, MemoryDirectory, PlayerId, PlayerRecord};

    fn record(byte: u8, lives: u32) -> PlayerRecord {
        PlayerRecord::new(
            PlayerId::new([byte; 16]),
            ClientId::new(byte as u64),
            format!("Pilot-{}", byte),
            lives,
        )
    }

    /// Session mid-play: timers armed at t=0, so the grace window is shut
    /// for any `now` past 5.0.
    fn running_state(config: &SessionConfig) -> SessionState {
        let mut state = SessionState::new();
        state.phase = SessionPhase::Running;
        state.countdown = Countdown::started(0.0, config.session_length_secs);
        state.grace = Countdown::started(0.0, GRACE_WINDOW_SECS);
        state
    }

    #[test]
    fn test_start_countdown_opens_play() {
        let config = SessionConfig::default();
        let mut state = SessionState::new();
        state.countdown = Countdown::started(0.0, config.start_delay_secs);
        let mut roster = Roster::new();
        let directory = MemoryDirectory::new();

        // Countdown still running: nothing moves
        let result = tick(&mut state, &mut roster, &directory, 3.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Starting);
        assert!(result.events.is_empty());

        // Expiry: spawn signal first, then the transition
        let result = tick(&mut state, &mut roster, &directory, 4.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(result.events[0].data, SessionEventData::SpawningStarted);
        assert_eq!(
            result.events[1].data,
            SessionEventData::PhaseChanged {
                from: SessionPhase::Starting,
                to: SessionPhase::Running,
            }
        );

        // Timers rearmed for play
        assert_eq!(state.countdown.remaining_secs(4.0), config.session_length_secs);
        assert!(state.grace.is_running(4.0));
        assert!(!result.session_over);
    }

    #[test]
    fn test_two_alive_play_continues() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        for rec in [record(1, 2), record(2, 1)] {
            roster.track(rec.id);
            directory.insert(rec);
        }

        let result = tick(&mut state, &mut roster, &directory, 10.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.winner.is_none());
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_winner_is_last_alive_in_tracking_order() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        for rec in [record(1, 0), record(2, 2), record(3, 0)] {
            roster.track(rec.id);
            directory.insert(rec);
        }

        let result = tick(&mut state, &mut roster, &directory, 10.0, 2, &config);

        assert_eq!(state.phase, SessionPhase::Ending);
        assert_eq!(state.winner, Some(PlayerId::new([2; 16])));
        assert_eq!(state.countdown.remaining_secs(10.0), config.end_delay_secs);
        assert_eq!(
            result.events[0].data,
            SessionEventData::WinnerDecided { winner: Some(PlayerId::new([2; 16])) }
        );
    }

    #[test]
    fn test_solo_loss_falls_back_to_first_tracked() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        let rec = record(1, 0);
        roster.track(rec.id);
        directory.insert(rec);

        tick(&mut state, &mut roster, &directory, 10.0, 1, &config);

        // No live ship anywhere, yet the lone pilot still gets the banner
        assert_eq!(state.phase, SessionPhase::Ending);
        assert_eq!(state.winner, Some(PlayerId::new([1; 16])));
    }

    #[test]
    fn test_solo_practice_keeps_running() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        let rec = record(1, 3);
        roster.track(rec.id);
        directory.insert(rec);

        // One ship alive and exactly one participant connected: practice mode
        tick(&mut state, &mut roster, &directory, 10.0, 1, &config);
        assert_eq!(state.phase, SessionPhase::Running);

        // Same ship, but a second participant is connected: last one standing
        tick(&mut state, &mut roster, &directory, 11.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Ending);
        assert_eq!(state.winner, Some(PlayerId::new([1; 16])));
    }

    #[test]
    fn test_time_expiry_ends_play_immediately() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        // Grace window wide open, but the session clock has run out
        state.grace = Countdown::started(200.0, GRACE_WINDOW_SECS);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        for rec in [record(1, 3), record(2, 2), record(3, 1)] {
            roster.track(rec.id);
            directory.insert(rec);
        }

        // now = 200 > 180s session length: ends with everyone still alive
        tick(&mut state, &mut roster, &directory, 200.0, 3, &config);

        assert_eq!(state.phase, SessionPhase::Ending);
        // Forward scan: the last live ship in tracking order takes it
        assert_eq!(state.winner, Some(PlayerId::new([3; 16])));
    }

    #[test]
    fn test_grace_window_suppresses_evaluation() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        for rec in [record(1, 0), record(2, 2)] {
            roster.track(rec.id);
            directory.insert(rec);
        }
        // A third reference nobody can resolve
        roster.track(PlayerId::new([3; 16]));

        // Inside the 5s window: no transition, no winner, no pruning
        let result = tick(&mut state, &mut roster, &directory, 2.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Running);
        assert!(state.winner.is_none());
        assert_eq!(roster.len(), 3);
        assert!(result.events.is_empty());

        // Window shut: pruning and elimination apply
        tick(&mut state, &mut roster, &directory, 6.0, 2, &config);
        assert_eq!(roster.len(), 2);
        assert_eq!(state.phase, SessionPhase::Ending);
    }

    #[test]
    fn test_unresolvable_refs_pruned_in_order() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        // Track four, resolve only the first and third
        for byte in 1..=4u8 {
            roster.track(PlayerId::new([byte; 16]));
        }
        directory.insert(record(1, 1));
        directory.insert(record(3, 2));

        tick(&mut state, &mut roster, &directory, 10.0, 2, &config);

        // Two alive, play continues, survivors keep their relative order
        assert_eq!(state.phase, SessionPhase::Running);
        let kept: Vec<u8> = roster.iter().map(|id| id.0[0]).collect();
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn test_empty_roster_ends_without_winner() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let directory = MemoryDirectory::new();

        let result = tick(&mut state, &mut roster, &directory, 10.0, 1, &config);

        assert_eq!(state.phase, SessionPhase::Ending);
        assert!(state.winner.is_none());
        assert_eq!(
            result.events[0].data,
            SessionEventData::WinnerDecided { winner: None }
        );
    }

    #[test]
    fn test_results_countdown_closes_session() {
        let config = SessionConfig::default();
        let mut state = running_state(&config);
        let mut roster = Roster::new();
        let mut directory = MemoryDirectory::new();
        let rec = record(1, 0);
        roster.track(rec.id);
        directory.insert(rec);

        tick(&mut state, &mut roster, &directory, 10.0, 2, &config);
        assert_eq!(state.phase, SessionPhase::Ending);
        let winner = state.winner;

        // Results countdown still running: nothing happens
        let result = tick(&mut state, &mut roster, &directory, 12.0, 2, &config);
        assert!(!result.session_over);
        assert!(result.events.is_empty());
        assert_eq!(state.winner, winner);

        // 4s end delay armed at t=10 expires at t=14
        let result = tick(&mut state, &mut roster, &directory, 14.0, 2, &config);
        assert!(result.session_over);
        assert_eq!(result.events[0].data, SessionEventData::SessionClosed);
        assert_eq!(state.winner, winner, "winner is written exactly once");
    }

    proptest! {
        #[test]
        fn phase_advances_forward_one_step(
            lives in proptest::collection::vec(0u32..4, 1..6),
            connected in 1usize..6,
            steps in proptest::collection::vec(0.0f64..400.0, 1..40),
        ) {
            let config = SessionConfig::default();
            let mut state = SessionState::new();
            state.countdown = Countdown::started(0.0, config.start_delay_secs);
            let mut roster = Roster::new();
            let mut directory = MemoryDirectory::new();
            for (i, l) in lives.iter().enumerate() {
                let rec = record(i as u8 + 1, *l);
                roster.track(rec.id);
                directory.insert(rec);
            }

            let mut times = steps;
            times.sort_by(f64::total_cmp);

            let mut last_phase = state.phase;
            for now in times {
                tick(&mut state, &mut roster, &directory, now, connected, &config);
                // Holds still or steps to the successor, never back,
                // never two at once
                prop_assert!(
                    state.phase == last_phase || last_phase.next() == Some(state.phase),
                    "phase jumped {:?} -> {:?}",
                    last_phase,
                    state.phase
                );
                if state.phase != SessionPhase::Ending {
                    prop_assert!(state.winner.is_none());
                }
                last_phase = state.phase;
            }
        }
    }
}
