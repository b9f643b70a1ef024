//! # Comet Clash Session Controller
//!
//! Authoritative session lifecycle for Comet Clash matches: phase state
//! machine, replicated countdowns, win evaluation, HUD derivation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 COMET CLASH SESSION                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── countdown.rs- Replicated wall-clock countdown           │
//! │  ├── screen.rs   - Camera projection and spawn bounds        │
//! │  └── color.rs    - Identity-derived player colors            │
//! │                                                              │
//! │  game/           - Lifecycle logic (authority-only)          │
//! │  ├── player.rs   - Player identity, records, roster          │
//! │  ├── state.rs    - Session phase and replicated state        │
//! │  ├── tick.rs     - Phase transitions and win evaluation      │
//! │  ├── hud.rs      - Per-participant display derivation        │
//! │  └── events.rs   - Lifecycle event records                   │
//! │                                                              │
//! │  network/        - Replication plumbing                      │
//! │  ├── replication.rs - Field updates and transport seam       │
//! │  ├── session.rs  - Host and replica endpoints                │
//! │  ├── registry.rs - Single-session ticket                     │
//! │  └── context.rs  - Clock, RTT, connected clients             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authority Discipline
//!
//! Exactly one endpoint per match mutates session state:
//! - All transitions and the winner decision run on [`SessionHost`]
//! - Replicas apply field updates and never write locally
//! - The winner field is written once, at the end of active play
//! - Replicas drop phase regressions so stale frames cannot rewind them
//!
//! Both endpoints derive their HUD through the same function, so a host
//! and a replica holding the same state render the same frame.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::countdown::Countdown;
pub use core::screen::{CameraProjection, ScreenBounds};
pub use game::hud::{derive_hud, HudView};
pub use game::player::{ClientId, PlayerDirectory, PlayerId, PlayerRecord, Roster};
pub use game::state::{SessionConfig, SessionPhase, SessionState};
pub use network::session::{SessionError, SessionHost, SessionReplica};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Spawn grace window in seconds. Fresh ships cannot lose the match
/// before they have had this long to orient.
pub const GRACE_WINDOW_SECS: f32 = 5.0;
