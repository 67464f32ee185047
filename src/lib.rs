//! Cave Flight - procedural tunnel generation and collision
//!
//! Core modules:
//! - `sim`: Deterministic cave generation and point-location (angles, segments, collision)
//! - `config`: Data-driven generator parameters
//! - `error`: Error taxonomy for broken geometry invariants and bad configuration

pub mod config;
pub mod error;
pub mod sim;

pub use config::{GameConfig, GeneratorConfig};
pub use error::CaveError;

use glam::DVec2;

/// Cave configuration constants
pub mod consts {
    /// Index of the quad the player spawns in
    pub const SPAWN_SEGMENT_INDEX: usize = 5;
    /// Default corridor length (before scaling)
    pub const TARGET_LENGTH: f64 = 350.0;
    /// Default world scale used by the game frontend
    pub const DEFAULT_SCALE: f64 = 20.0;

    /// Quad containment tolerance: points this close to an edge line count
    /// as on the edge
    pub const QUAD_EPSILON: f64 = 1e-9;

    /// Offsets from the cursor that are checked for containment, closest first
    pub const SEGMENT_CHECK_ORDER: [isize; 5] = [0, 1, -1, 2, -2];
}

/// Convert polar (r, phi) around `center` to cartesian (x, y)
///
/// Trig goes through `libm` so a seed yields the same bits on every target.
#[inline]
pub fn polar_to_cartesian(center: DVec2, r: f64, phi: f64) -> DVec2 {
    center + DVec2::new(r * libm::cos(phi), r * libm::sin(phi))
}

/// Convert cartesian `p` to polar (r, phi) around `center`.
/// `phi` is the raw `atan2` result in (-π, π].
#[inline]
pub fn cartesian_to_polar(p: DVec2, center: DVec2) -> (f64, f64) {
    let d = p - center;
    (d.length(), libm::atan2(d.y, d.x))
}
