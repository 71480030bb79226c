//! Runner settings
//!
//! Loaded from an optional JSON file. Missing fields take their defaults.
//! Physical constants are fixed and live in `consts`, not here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::ARENA_RADIUS;
use crate::sim::Arena;

/// Headless runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one at random
    pub seed: Option<u64>,

    // === Arena ===
    /// Canvas size the arena is centered in
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub arena_radius: f32,

    // === Run ===
    /// Ticks per simulated second
    pub ticks_per_second: u32,
    /// Simulated seconds to run
    pub duration_secs: f32,
    /// Let the autopilot steer the gap
    pub idle_mode: bool,
    /// Print the final snapshot as JSON on stdout
    pub dump_snapshot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            canvas_width: 400.0,
            canvas_height: 400.0,
            arena_radius: ARENA_RADIUS,

            ticks_per_second: 60,
            duration_secs: 30.0,
            idle_mode: true,
            dump_snapshot: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace nonsensical values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.arena_radius.is_finite() && self.arena_radius > 0.0) {
            log::warn!("arena_radius {} invalid, using {}", self.arena_radius, defaults.arena_radius);
            self.arena_radius = defaults.arena_radius;
        }
        if self.ticks_per_second == 0 {
            log::warn!("ticks_per_second must be > 0, using {}", defaults.ticks_per_second);
            self.ticks_per_second = defaults.ticks_per_second;
        }
        if !(self.duration_secs.is_finite() && self.duration_secs >= 0.0) {
            log::warn!("duration_secs {} invalid, using {}", self.duration_secs, defaults.duration_secs);
            self.duration_secs = defaults.duration_secs;
        }
        self
    }

    /// Arena centered in the configured canvas
    pub fn arena(&self) -> Arena {
        Arena::centered_in(self.canvas_width, self.canvas_height, self.arena_radius)
    }

    /// Fixed step length in seconds
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.ticks_per_second as f64
    }

    /// Total number of ticks to run
    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs as f64 * self.ticks_per_second as f64).round() as u64
    }
}
