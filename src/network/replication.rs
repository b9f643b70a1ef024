//! Field Replication
//!
//! Labeled updates for each replicated session field, the transport seam
//! the controller is injected with, and an in-process loopback transport
//! for tests and the demo binary. Real wire transports live in the network
//! runtime, behind the same two traits.

use serde::{Serialize, Deserialize};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::core::countdown::Countdown;
use crate::core::screen::ScreenBounds;
use crate::game::player::PlayerId;
use crate::game::state::SessionPhase;

// =============================================================================
// FIELD UPDATES
// =============================================================================

/// One replicated session field with its new value.
///
/// The authoritative endpoint publishes exactly the fields a tick
/// changed; observers overwrite their local copy on receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldUpdate {
    /// Lifecycle phase
    Phase(SessionPhase),
    /// Main match timer
    Countdown(Countdown),
    /// Win-check suppression window
    GraceWindow(Countdown),
    /// Winning record reference
    Winner(Option<PlayerId>),
    /// Spawn-area bounds
    Bounds(ScreenBounds),
}

impl FieldUpdate {
    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }

    /// Field label for logs.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Phase(_) => "phase",
            FieldUpdate::Countdown(_) => "countdown",
            FieldUpdate::GraceWindow(_) => "grace_window",
            FieldUpdate::Winner(_) => "winner",
            FieldUpdate::Bounds(_) => "bounds",
        }
    }
}

/// Replication errors.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    /// Payload could not be encoded or decoded.
    #[error("Codec failure: {0}")]
    Codec(#[from] bincode::Error),
}

// =============================================================================
// TRANSPORT SEAM
// =============================================================================

/// Authoritative side of the transport: publish one field update.
pub trait ReplicationSink {
    /// Publish an update towards every observer.
    ///
    /// Publishing with nobody subscribed succeeds; a solo practice
    /// session has no observers at all.
    fn publish(&self, update: FieldUpdate) -> Result<(), ReplicationError>;
}

/// Observer side of the transport: drain pending field updates.
pub trait ReplicationSource {
    /// Drain every update that arrived since the last poll, oldest
    /// first. Never blocks.
    fn poll(&mut self) -> Result<Vec<FieldUpdate>, ReplicationError>;
}

// =============================================================================
// LOOPBACK TRANSPORT
// =============================================================================

/// In-process transport: a tokio broadcast channel carrying bincode
/// frames. One per match in the demo binary and in tests.
#[derive(Clone)]
pub struct LoopbackTransport {
    frames: broadcast::Sender<Vec<u8>>,
}

impl LoopbackTransport {
    /// Create with room for `capacity` in-flight updates per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (frames, _) = broadcast::channel(capacity);
        Self { frames }
    }

    /// Open a subscription for one observer.
    pub fn subscribe(&self) -> LoopbackSubscription {
        LoopbackSubscription {
            frames: self.frames.subscribe(),
        }
    }
}

impl ReplicationSink for LoopbackTransport {
    fn publish(&self, update: FieldUpdate) -> Result<(), ReplicationError> {
        let frame = update.to_bytes()?;
        debug!(
            "publish {}: {}",
            update.field_name(),
            serde_json::to_string(&update).unwrap_or_default()
        );
        // A send error only means nobody is subscribed right now
        let _ = self.frames.send(frame);
        Ok(())
    }
}

/// One observer's subscription to a [`LoopbackTransport`].
pub struct LoopbackSubscription {
    frames: broadcast::Receiver<Vec<u8>>,
}

impl ReplicationSource for LoopbackSubscription {
    fn poll(&mut self) -> Result<Vec<FieldUpdate>, ReplicationError> {
        let mut updates = Vec::new();
        loop {
            match self.frames.try_recv() {
                Ok(frame) => updates.push(FieldUpdate::from_bytes(&frame)?),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    // Host is gone; whatever we already drained still applies
                    debug!("replication channel closed");
                    break;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    // Oldest frames were overwritten; keep draining the rest
                    warn!("replication subscriber lagged, {} updates dropped", skipped);
                }
            }
        }
        Ok(updates)
    }
}
