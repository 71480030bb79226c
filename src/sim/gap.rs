//! Escape gap geometry
//!
//! The gap is an angular window centered at angle 0 in the arena's own frame.
//! The arena rotates, so a world-space angle is first brought into the arena
//! frame by subtracting the rotation and wrapping into [0, 2π).

use serde::{Deserialize, Serialize};

use crate::consts::GAP_HALF_WIDTH;
use crate::normalize_angle_positive;

/// Angular window in the arena wall that balls can escape through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Half of the angular width (radians)
    pub half_width: f32,
}

impl Default for Gap {
    fn default() -> Self {
        Self {
            half_width: GAP_HALF_WIDTH,
        }
    }
}

impl Gap {
    /// Total angular width of the gap
    #[inline]
    pub fn width(&self) -> f32 {
        2.0 * self.half_width
    }

    /// World angle expressed in the arena frame, in [0, 2π)
    #[inline]
    pub fn relative_angle(world_angle: f32, rotation: f32) -> f32 {
        normalize_angle_positive(world_angle - rotation)
    }

    /// Check if an arena-frame angle in [0, 2π) falls inside the window
    pub fn contains(&self, relative_angle: f32) -> bool {
        use std::f32::consts::TAU;
        // The window straddles 0, so it shows up at both ends of the range
        relative_angle <= self.half_width || relative_angle >= TAU - self.half_width
    }

    /// Check if a world angle lines up with the gap at the given rotation
    pub fn contains_world(&self, world_angle: f32, rotation: f32) -> bool {
        self.contains(Self::relative_angle(world_angle, rotation))
    }

    /// World-frame angles where the solid wall starts and ends (for drawing the arc)
    pub fn wall_span(&self, rotation: f32) -> (f32, f32) {
        use std::f32::consts::TAU;
        (rotation + self.half_width, rotation + TAU - self.half_width)
    }
}
