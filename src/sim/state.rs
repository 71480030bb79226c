//! Simulation state types
//!
//! Balls are plain data. The ball list is owned by the caller and threaded
//! through `tick`, and the session (`GameState`) is only one such caller.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gap::Gap;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a new game to start
    Menu,
    /// Active simulation
    Playing,
    /// Simulation frozen (ticks are not run)
    Paused,
}

/// Display color of a ball as an HSL hue (saturation and lightness are fixed)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallColor {
    /// Hue in degrees, [0, 360)
    pub hue: f32,
}

impl BallColor {
    pub const SATURATION: f32 = 0.8;
    pub const LIGHTNESS: f32 = 0.6;

    pub fn new(hue: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        // rem_euclid can round up to 360 for tiny negative inputs
        Self {
            hue: if hue >= 360.0 { 0.0 } else { hue },
        }
    }

    /// CSS color string, e.g. `hsl(120, 80%, 60%)`
    pub fn to_css(&self) -> String {
        format!(
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue,
            Self::SATURATION * 100.0,
            Self::LIGHTNESS * 100.0
        )
    }

    /// sRGB bytes
    pub fn to_rgb(&self) -> [u8; 3] {
        let s = Self::SATURATION;
        let l = Self::LIGHTNESS;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.hue / 60.0;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_byte(r), to_byte(g), to_byte(b)]
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    radius: f32,
    pub color: BallColor,
    /// Set once, the tick the ball leaves through the gap
    pub escaped: bool,
}

impl Ball {
    /// Create a live ball. `radius` must be positive.
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: BallColor) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            pos,
            vel,
            radius,
            color,
            escaped: false,
        }
    }

    /// Collision and visual radius (fixed at creation)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Mass is proportional to radius, not area
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass() * self.vel.length_squared()
    }
}

/// Circular arena with a single rotating gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
}

impl Arena {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Arena centered in a canvas of the given size
    pub fn centered_in(width: f32, height: f32, radius: f32) -> Self {
        Self::new(Vec2::new(width / 2.0, height / 2.0), radius)
    }

    pub fn gap(&self) -> Gap {
        Gap::default()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::centered_in(400.0, 400.0, ARENA_RADIUS)
    }
}

/// Serializable view of a session for renderers and tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub elapsed_secs: f64,
    pub rotation: f32,
    pub arena: Arena,
    pub balls: Vec<Ball>,
}

/// A play session: the caller side of the simulation core
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub arena: Arena,
    /// Arena rotation (radians, unbounded)
    pub rotation: f32,
    /// Live balls, in spawn order
    pub balls: Vec<Ball>,
    /// Number of balls that escaped this game
    pub score: u64,
    /// Seconds spent in the Playing phase (display only)
    pub elapsed_secs: f64,
    /// Ticks run this game
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a session in the menu phase
    pub fn new(seed: u64, arena: Arena) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            arena,
            rotation: 0.0,
            balls: Vec::new(),
            score: 0,
            elapsed_secs: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset counters, spawn the initial batch and start playing
    pub fn start(&mut self) {
        self.rotation = 0.0;
        self.score = 0;
        self.elapsed_secs = 0.0;
        self.time_ticks = 0;
        self.balls = super::spawn::spawn_batch(self.arena.center, SPAWN_BATCH, &mut self.rng);
        self.phase = GamePhase::Playing;
        log::info!(
            "Game started (seed {}), {} balls in arena r={}",
            self.seed,
            self.balls.len(),
            self.arena.radius
        );
    }

    /// Return to the menu, dropping the current balls
    pub fn end(&mut self) {
        log::info!(
            "Game ended: score {}, {:.1}s, {} balls left",
            self.score,
            self.elapsed_secs,
            self.balls.len()
        );
        self.balls.clear();
        self.phase = GamePhase::Menu;
    }

    /// Toggle between Playing and Paused (no effect in the menu)
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::Menu => GamePhase::Menu,
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            elapsed_secs: self.elapsed_secs,
            rotation: self.rotation,
            arena: self.arena,
            balls: self.balls.clone(),
        }
    }
}
