//! Circle Escape - balls bouncing inside a rotating circular arena
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, collisions, gap escapes, session state)
//! - `settings`: Runner configuration

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Fixed design constants (not configurable)
pub mod consts {
    use std::f32::consts::PI;

    /// Default arena radius
    pub const ARENA_RADIUS: f32 = 150.0;

    /// Half angular width of the escape gap (full gap is π/15)
    pub const GAP_HALF_WIDTH: f32 = PI / 30.0;

    /// Balls spawned per batch (initial spawn and per escapee)
    pub const SPAWN_BATCH: usize = 3;
    /// Spawn offset from the arena center is drawn from [0, max)
    pub const SPAWN_OFFSET_MAX: f32 = 60.0;
    /// Initial speed range (units/tick)
    pub const BALL_MIN_SPEED: f32 = 0.3;
    pub const BALL_MAX_SPEED: f32 = 0.8;
    /// Ball radius range
    pub const BALL_MIN_RADIUS: f32 = 6.0;
    pub const BALL_MAX_RADIUS: f32 = 9.0;

    /// Ball-ball restitution
    pub const RESTITUTION: f32 = 0.8;
    /// Speed kept after a wall bounce
    pub const WALL_DAMPING: f32 = 0.95;

    /// Per-tick chance of a random velocity nudge
    pub const JITTER_CHANCE: f64 = 0.01;
    /// Total width of the nudge per velocity component
    pub const JITTER_MAGNITUDE: f32 = 0.1;

    /// Rotation applied per left/right input (radians)
    pub const ROTATION_STEP: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle_positive(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
