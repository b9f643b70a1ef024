//! Screen Bounds
//!
//! Half-extents of the visible play area, derived from the local camera.
//! Spawners use these to place ships and comets on screen edges.

use serde::{Serialize, Deserialize};

/// Orthographic camera description, as reported by the local renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraProjection {
    /// Half of the vertical world-space extent.
    pub half_height: f32,

    /// Width divided by height of the viewport.
    pub aspect_ratio: f32,
}

impl CameraProjection {
    /// Create a projection from half-height and aspect ratio.
    pub const fn new(half_height: f32, aspect_ratio: f32) -> Self {
        Self {
            half_height,
            aspect_ratio,
        }
    }

    /// Derive screen bounds: y is the half-height, x scales it by aspect.
    #[inline]
    pub fn screen_bounds(&self) -> ScreenBounds {
        ScreenBounds {
            x: self.half_height * self.aspect_ratio,
            y: self.half_height,
        }
    }
}

/// Half-extents of the visible play area in world units.
///
/// Computed once per session from [`CameraProjection`]; the authoritative
/// value replicates so all participants spawn against the same edges.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenBounds {
    /// Horizontal half-extent.
    pub x: f32,

    /// Vertical half-extent.
    pub y: f32,
}

impl ScreenBounds {
    /// Zero bounds (camera not yet known).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}
