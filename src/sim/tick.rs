//! Fixed-step simulation tick
//!
//! `tick` is the whole physics step: integrate, resolve ball pairs, then
//! resolve the wall. The order is fixed. `GameState::advance` is the session
//! wrapper that applies input, runs a tick and replaces escaped balls.

use rand::Rng;

use super::collision::{BoundaryOutcome, apply_jitter, resolve_all_pairs, resolve_boundary};
use super::gap::Gap;
use super::spawn::spawn_batch;
use super::state::{Arena, Ball, GamePhase, GameState};
use crate::consts::*;
use crate::normalize_angle;

/// Result of one physics tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Balls still inside the arena, in their original order
    pub live: Vec<Ball>,
    /// Balls that left through the gap this tick
    pub escaped: Vec<Ball>,
}

/// Advance every ball by one tick
///
/// `rotation` is read once and used for every ball. Escaped balls are handed
/// back separately and must not be simulated again.
pub fn tick(balls: Vec<Ball>, arena: &Arena, rotation: f32, rng: &mut impl Rng) -> TickOutcome {
    let mut balls = balls;

    for ball in balls.iter_mut() {
        ball.pos += ball.vel;
    }

    let contacts = resolve_all_pairs(&mut balls);

    let mut bounces = 0usize;
    for ball in balls.iter_mut() {
        match resolve_boundary(ball, arena, rotation) {
            BoundaryOutcome::Escaped => continue,
            BoundaryOutcome::Bounced => bounces += 1,
            BoundaryOutcome::Inside => {}
        }
        apply_jitter(ball, rng);
    }

    let (escaped, live): (Vec<Ball>, Vec<Ball>) = balls.into_iter().partition(|b| b.escaped);

    log::trace!(
        "tick: {} live, {} escaped, {} contacts, {} bounces",
        live.len(),
        escaped.len(),
        contacts,
        bounces
    );

    TickOutcome { live, escaped }
}

/// Arena rotation input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotate {
    Left,
    Right,
}

impl Rotate {
    /// Signed rotation step
    pub fn delta(self) -> f32 {
        match self {
            Rotate::Left => -ROTATION_STEP,
            Rotate::Right => ROTATION_STEP,
        }
    }
}

/// Input commands for a single session tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One rotation step this tick
    pub rotate: Option<Rotate>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot steers the gap away from balls
    pub idle_mode: bool,
}

/// What happened during one session tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub escaped: usize,
    pub spawned: usize,
    /// Live balls after replacements were added
    pub live: usize,
}

/// Angle margin around the gap the autopilot treats as dangerous
const AUTOPILOT_MARGIN: f32 = 4.0 * GAP_HALF_WIDTH;
/// Only balls this close to the wall (fraction of arena radius) are considered
const AUTOPILOT_WATCH_RADIUS: f32 = 0.7;

impl GameState {
    /// Apply input and run one tick; `None` when not playing
    pub fn advance(&mut self, input: &TickInput, dt_secs: f64) -> Option<TickReport> {
        if input.pause {
            self.toggle_pause();
            log::info!("Phase -> {:?}", self.phase);
        }
        if self.phase != GamePhase::Playing {
            return None;
        }

        let rotate = if input.idle_mode {
            self.autopilot()
        } else {
            input.rotate
        };
        if let Some(rotate) = rotate {
            self.rotation += rotate.delta();
        }

        // Elapsed time never runs backwards
        self.elapsed_secs += dt_secs.max(0.0);
        self.time_ticks += 1;

        let balls = std::mem::take(&mut self.balls);
        let outcome = tick(balls, &self.arena, self.rotation, &mut self.rng);
        self.balls = outcome.live;

        let escaped = outcome.escaped.len();
        let replacements = spawn_batch(self.arena.center, escaped * SPAWN_BATCH, &mut self.rng);
        let spawned = replacements.len();
        self.balls.extend(replacements);
        self.score += escaped as u64;

        if escaped > 0 {
            log::debug!(
                "{} ball(s) escaped at tick {}, spawned {}, {} live, score {}",
                escaped,
                self.time_ticks,
                spawned,
                self.balls.len(),
                self.score
            );
        }

        Some(TickReport {
            escaped,
            spawned,
            live: self.balls.len(),
        })
    }

    /// Pick a rotation step that moves the gap away from the most threatening ball
    fn autopilot(&self) -> Option<Rotate> {
        let watch = self.arena.radius * AUTOPILOT_WATCH_RADIUS;

        // Ball nearest the wall that sits close to the gap window
        let threat = self
            .balls
            .iter()
            .filter_map(|ball| {
                let offset = ball.pos - self.arena.center;
                let distance = offset.length();
                if distance < watch {
                    return None;
                }
                let angle = offset.y.atan2(offset.x);
                // Signed angle from the gap center to the ball
                let from_gap = normalize_angle(Gap::relative_angle(angle, self.rotation));
                (from_gap.abs() < AUTOPILOT_MARGIN).then_some((distance, from_gap))
            })
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))?;

        // Ball ahead of the gap (positive side): rotate the gap the other way
        let (_, from_gap) = threat;
        if from_gap >= 0.0 {
            Some(Rotate::Left)
        } else {
            Some(Rotate::Right)
        }
    }
}
