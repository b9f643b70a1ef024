//! Core session primitives.
//!
//! Small value types shared by the session state machine and the HUD.
//! Everything here is pure data; identical inputs read identically on
//! every participant.

pub mod countdown;
pub mod screen;
pub mod color;

// Re-export core types
pub use countdown::Countdown;
pub use screen::{CameraProjection, ScreenBounds};
pub use color::PlayerColor;
