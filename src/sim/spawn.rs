//! Ball factory
//!
//! The random source is always passed in so spawn scenarios can be replayed
//! from a seed.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, BallColor};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Create a ball near `center`
///
/// - offset from center in [0, 60) at a uniform angle
/// - speed in [0.3, 0.8) at a uniform heading
/// - radius in [6, 9), mass = radius
/// - random hue
pub fn spawn_ball(center: Vec2, rng: &mut impl Rng) -> Ball {
    let offset_angle = rng.random_range(0.0..TAU);
    let offset = rng.random_range(0.0..SPAWN_OFFSET_MAX);
    let pos = center + polar_to_cartesian(offset, offset_angle);

    let speed = rng.random_range(BALL_MIN_SPEED..BALL_MAX_SPEED);
    let heading = rng.random_range(0.0..TAU);
    let vel = polar_to_cartesian(speed, heading);

    let radius = rng.random_range(BALL_MIN_RADIUS..BALL_MAX_RADIUS);
    let color = BallColor::new(rng.random_range(0.0..360.0));

    Ball::new(pos, vel, radius, color)
}

/// Spawn `count` balls around `center`
pub fn spawn_batch(center: Vec2, count: usize, rng: &mut impl Rng) -> Vec<Ball> {
    (0..count).map(|_| spawn_ball(center, rng)).collect()
}
