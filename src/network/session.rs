//! Session Endpoints
//!
//! The capability split between the one authoritative participant and
//! everyone else. [`SessionHost`] owns every mutator and publishes
//! per-field diffs; [`SessionReplica`] applies incoming updates and
//! exposes read-only views. Both derive their HUD through the same
//! function, so they render identically given the same clock.

use tracing::{info, debug, warn};

use crate::GRACE_WINDOW_SECS;
use crate::core::screen::{CameraProjection, ScreenBounds};
use crate::game::events::SessionEvent;
use crate::game::hud::{derive_hud, HudView};
use crate::game::player::{ClientId, PlayerDirectory, PlayerId, Roster};
use crate::game::state::{SessionState, SessionPhase, SessionConfig};
use crate::game::tick::tick;
use crate::network::context::NetworkContext;
use crate::network::registry::{SessionRegistry, SessionTicket};
use crate::network::replication::{
    FieldUpdate, ReplicationError, ReplicationSink, ReplicationSource,
};

/// Session endpoint errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session was already started.
    #[error("Session already started")]
    AlreadyStarted,

    /// Replication failed.
    #[error("Replication failed: {0}")]
    Replication(#[from] ReplicationError),
}

/// What one authoritative render tick produced.
#[derive(Debug)]
pub struct TickOutput {
    /// Display state for the local HUD
    pub hud: HudView,
    /// Lifecycle events for spawners and the runtime
    pub events: Vec<SessionEvent>,
    /// The runtime should tear the match down now
    pub session_over: bool,
}

// =============================================================================
// SESSION HOST
// =============================================================================

/// Replicated fields changed locally but not yet accepted by the sink.
#[derive(Debug, Default, Clone, Copy)]
struct DirtyFields {
    phase: bool,
    countdown: bool,
    grace: bool,
    winner: bool,
    bounds: bool,
}

/// The authoritative session endpoint. Exactly one per match; the ticket
/// requirement makes a second live host unconstructible.
pub struct SessionHost<S: ReplicationSink> {
    state: SessionState,
    roster: Roster,
    config: SessionConfig,
    sink: S,
    ticket: SessionTicket,
    started: bool,
    dirty: DirtyFields,
}

impl<S: ReplicationSink> SessionHost<S> {
    /// Open the authoritative endpoint over a replication sink.
    pub fn open(ticket: SessionTicket, config: SessionConfig, sink: S) -> Self {
        Self {
            state: SessionState::new(),
            roster: Roster::new(),
            config,
            sink,
            ticket,
            started: false,
            dirty: DirtyFields::default(),
        }
    }

    /// Start the session: derive bounds from the local camera, arm the
    /// start countdown, publish the seed fields. Runs once per match;
    /// UI collaborators reset scoreboards when they observe it.
    pub fn start(&mut self, camera: &CameraProjection, now: f64) -> Result<(), SessionError> {
        if self.started {
            return Err(SessionError::AlreadyStarted);
        }
        self.started = true;

        self.state.bounds = camera.screen_bounds();
        self.state.phase = SessionPhase::Starting;
        self.state.countdown.restart(now, self.config.start_delay_secs);

        info!(
            "session starting: {}s to spawn, bounds {:.2}x{:.2}",
            self.config.start_delay_secs, self.state.bounds.x, self.state.bounds.y
        );

        self.dirty.phase = true;
        self.dirty.countdown = true;
        self.dirty.bounds = true;
        self.flush_dirty()
    }

    /// Track a newly created player record. The player-data collaborator
    /// calls this exactly once per record; there is no dedup here.
    pub fn track_new_player(&mut self, id: PlayerId) {
        debug!("tracking player record {}", id.to_uuid_string());
        self.roster.track(id);
    }

    /// A client joined mid-session: restart the grace window so the fresh
    /// ship cannot be eliminated into an instant loss.
    pub fn handle_player_joined(&mut self, client: ClientId, now: f64) -> Result<(), SessionError> {
        info!("client {} joined, grace window restarted", client.as_u64());
        self.state.grace.restart(now, GRACE_WINDOW_SECS);
        self.dirty.grace = true;
        self.flush_dirty()
    }

    /// Run the authoritative tick, publish whatever it changed (plus
    /// anything still unpublished from a failed flush), and derive this
    /// participant's HUD.
    pub fn render_tick(
        &mut self,
        directory: &dyn PlayerDirectory,
        ctx: &dyn NetworkContext,
    ) -> Result<TickOutput, SessionError> {
        let now = ctx.session_now();
        let connected_count = ctx.connected_clients().len();

        let before = self.state.clone();
        let result = tick(
            &mut self.state,
            &mut self.roster,
            directory,
            now,
            connected_count,
            &self.config,
        );
        self.mark_changes(&before);
        self.flush_dirty()?;

        let hud = derive_hud(&self.state, directory, now, ctx.local_rtt_ms());
        Ok(TickOutput {
            hud,
            events: result.events,
            session_over: result.session_over,
        })
    }

    /// Mark every field this tick changed for publication.
    fn mark_changes(&mut self, before: &SessionState) {
        if self.state.phase != before.phase {
            self.dirty.phase = true;
        }
        if self.state.countdown != before.countdown {
            self.dirty.countdown = true;
        }
        if self.state.grace != before.grace {
            self.dirty.grace = true;
        }
        if self.state.winner != before.winner {
            self.dirty.winner = true;
        }
        if self.state.bounds != before.bounds {
            self.dirty.bounds = true;
        }
    }

    /// Publish every marked field. A flag clears only once the sink has
    /// accepted its update, so a failed publish stays marked and goes out
    /// on the next flush instead of being lost.
    fn flush_dirty(&mut self) -> Result<(), SessionError> {
        if self.dirty.phase {
            self.sink.publish(FieldUpdate::Phase(self.state.phase))?;
            self.dirty.phase = false;
        }
        if self.dirty.countdown {
            self.sink.publish(FieldUpdate::Countdown(self.state.countdown))?;
            self.dirty.countdown = false;
        }
        if self.dirty.grace {
            self.sink.publish(FieldUpdate::GraceWindow(self.state.grace))?;
            self.dirty.grace = false;
        }
        if self.dirty.winner {
            self.sink.publish(FieldUpdate::Winner(self.state.winner))?;
            self.dirty.winner = false;
        }
        if self.dirty.bounds {
            self.sink.publish(FieldUpdate::Bounds(self.state.bounds))?;
            self.dirty.bounds = false;
        }
        Ok(())
    }

    /// Spawn-area half-extents.
    pub fn screen_bounds(&self) -> ScreenBounds {
        self.state.bounds
    }

    /// Is the match in active play?
    pub fn game_is_running(&self) -> bool {
        self.state.game_is_running()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Winning record, once play has ended.
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    /// Tear the session down and surrender the ticket. Unconditional and
    /// immediate; callers decide when, normally on `session_over`.
    pub fn shutdown(self) -> SessionRegistry {
        info!("session host shut down");
        self.ticket.close()
    }
}

// =============================================================================
// SESSION REPLICA
// =============================================================================

/// Read-only session endpoint held by every non-authoritative
/// participant.
pub struct SessionReplica<S: ReplicationSource> {
    state: SessionState,
    source: S,
    ticket: SessionTicket,
}

impl<S: ReplicationSource> SessionReplica<S> {
    /// Open an observer endpoint over a subscription.
    pub fn open(ticket: SessionTicket, source: S) -> Self {
        Self {
            state: SessionState::new(),
            source,
            ticket,
        }
    }

    /// Compute bounds from the local camera so spawners can use them
    /// before the authoritative value arrives and overwrites them.
    pub fn start(&mut self, camera: &CameraProjection) {
        self.state.bounds = camera.screen_bounds();
        debug!(
            "replica bounds {:.2}x{:.2} until the replicated value lands",
            self.state.bounds.x, self.state.bounds.y
        );
    }

    /// Drain and apply pending field updates. Returns how many applied.
    pub fn sync(&mut self) -> Result<usize, SessionError> {
        let updates = self.source.poll()?;
        let count = updates.len();
        for update in updates {
            self.apply(update);
        }
        Ok(count)
    }

    /// Apply one update. Phase regressions are dropped: the stream has a
    /// single writer, so a regression is reordering noise, never intent.
    fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Phase(phase) => {
                if phase < self.state.phase {
                    warn!(
                        "ignoring phase regression {:?} -> {:?}",
                        self.state.phase, phase
                    );
                    return;
                }
                self.state.phase = phase;
            }
            FieldUpdate::Countdown(countdown) => self.state.countdown = countdown,
            FieldUpdate::GraceWindow(grace) => self.state.grace = grace,
            FieldUpdate::Winner(winner) => self.state.winner = winner,
            FieldUpdate::Bounds(bounds) => self.state.bounds = bounds,
        }
    }

    /// Derive this participant's HUD for the tick.
    pub fn render_tick(
        &self,
        directory: &dyn PlayerDirectory,
        ctx: &dyn NetworkContext,
    ) -> HudView {
        derive_hud(&self.state, directory, ctx.session_now(), ctx.local_rtt_ms())
    }

    /// Spawn-area half-extents.
    pub fn screen_bounds(&self) -> ScreenBounds {
        self.state.bounds
    }

    /// Is the match in active play?
    pub fn game_is_running(&self) -> bool {
        self.state.game_is_running()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Winning record, once the update has arrived.
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    /// Drop the observer endpoint and surrender its ticket.
    pub fn shutdown(self) -> SessionRegistry {
        info!("session replica shut down");
        self.ticket.close()
    }
}
