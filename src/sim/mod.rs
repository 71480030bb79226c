//! Simulation core
//!
//! All physics lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One fixed step per tick, integration then ball pairs then the wall
//! - Randomness only through an injected RNG
//! - Ball order is preserved across ticks

pub mod collision;
pub mod gap;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    BoundaryOutcome, apply_jitter, resolve_all_pairs, resolve_ball_collision, resolve_boundary,
};
pub use gap::Gap;
pub use spawn::{spawn_ball, spawn_batch};
pub use state::{Arena, Ball, BallColor, GamePhase, GameState, Snapshot};
pub use tick::{Rotate, TickInput, TickOutcome, TickReport, tick};
