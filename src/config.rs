//! Cave generator configuration
//!
//! Lengths are given in world units at scale 1.0; `scaled` converts them to
//! the scale the game is played at. Loaded from / saved to JSON.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCALE, SPAWN_SEGMENT_INDEX, TARGET_LENGTH};
use crate::error::CaveError;

/// Parameters of the constrained random walk that builds the corridor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // === Circles ===
    /// Minimum angle walked around one circle before switching (radians)
    pub min_angle_per_center: f64,
    /// Maximum angle walked around one circle before switching (radians)
    pub max_angle_per_center: f64,
    /// Minimum circle radius
    pub min_radius: f64,
    /// Maximum circle radius
    pub max_radius: f64,

    // === Segments ===
    /// Minimum centerline arc length of one segment
    pub min_segment_arc_length: f64,
    /// Maximum centerline arc length of one segment
    pub max_segment_arc_length: f64,

    // === Walls ===
    /// Minimum corridor diameter (sum of both wall offsets)
    pub min_cave_diameter: f64,
    /// Maximum corridor diameter
    pub max_cave_diameter: f64,

    /// Quad the player spawns in
    pub spawn_segment_index: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_angle_per_center: 30f64.to_radians(),
            max_angle_per_center: 120f64.to_radians(),
            min_radius: 10.0,
            max_radius: 40.0,

            min_segment_arc_length: 0.5,
            max_segment_arc_length: 5.0,

            min_cave_diameter: 2.5,
            max_cave_diameter: 20.0,

            spawn_segment_index: SPAWN_SEGMENT_INDEX,
        }
    }
}

impl GeneratorConfig {
    /// Scale all lengths (angles and indices stay untouched)
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            min_radius: self.min_radius * scale,
            max_radius: self.max_radius * scale,
            min_segment_arc_length: self.min_segment_arc_length * scale,
            max_segment_arc_length: self.max_segment_arc_length * scale,
            min_cave_diameter: self.min_cave_diameter * scale,
            max_cave_diameter: self.max_cave_diameter * scale,
            ..self.clone()
        }
    }

    /// Check the preconditions the generator relies on
    pub fn validate(&self) -> Result<(), CaveError> {
        let ranges = [
            ("angle_per_center", self.min_angle_per_center, self.max_angle_per_center),
            ("radius", self.min_radius, self.max_radius),
            ("segment_arc_length", self.min_segment_arc_length, self.max_segment_arc_length),
            ("cave_diameter", self.min_cave_diameter, self.max_cave_diameter),
        ];
        for (name, min, max) in ranges {
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
                return Err(CaveError::InvalidConfig(format!(
                    "{name}: expected 0 < min <= max, got [{min}, {max}]"
                )));
            }
        }
        // Walls are drawn up to max_cave_diameter / 2 from the centerline,
        // the inner one must never reach the circle center.
        if self.max_cave_diameter / 2.0 > self.min_radius {
            return Err(CaveError::InvalidConfig(format!(
                "max_cave_diameter / 2 ({}) exceeds min_radius ({})",
                self.max_cave_diameter / 2.0,
                self.min_radius
            )));
        }
        // Segments are short arcs; one segment must stay well below half a turn.
        if self.max_segment_arc_length / self.min_radius >= std::f64::consts::FRAC_PI_2 {
            return Err(CaveError::InvalidConfig(format!(
                "max_segment_arc_length ({}) too long for min_radius ({})",
                self.max_segment_arc_length, self.min_radius
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, CaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// User-facing game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World scale (multiplies every generator length)
    pub scale: f64,
    /// Corridor length before scaling
    pub length: f64,
    /// Cave seed
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            length: TARGET_LENGTH,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Generator parameters at this game's scale
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::default().scaled(self.scale)
    }

    /// Target corridor arc length at this game's scale
    pub fn target_arc_length(&self) -> f64 {
        self.length * self.scale
    }

    pub fn from_json(json: &str) -> Result<Self, CaveError> {
        let config: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded game config (seed {}, scale {}, length {})",
            config.seed,
            config.scale,
            config.length
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
