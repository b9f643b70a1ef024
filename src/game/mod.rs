//! Game Logic Module
//!
//! Session lifecycle rules, independent of any transport.
//!
//! ## Module Structure
//!
//! - `player`: Identity types, record lookup seam, tracked roster
//! - `state`: Phase machine and replicated session state
//! - `tick`: Authoritative phase advance and win evaluation
//! - `hud`: Derived display state, recomputed per render tick
//! - `events`: Lifecycle events for spawners and the runtime

pub mod player;
pub mod state;
pub mod tick;
pub mod hud;
pub mod events;

// Re-export key types
pub use player::{PlayerId, ClientId, PlayerRecord, PlayerDirectory, Roster};
pub use state::{SessionState, SessionPhase, SessionConfig};
pub use tick::TickResult;
pub use hud::HudView;
pub use events::SessionEvent;
