//! Error types for cave generation and geometry queries.

use thiserror::Error;

/// Errors raised by the cave core.
///
/// Geometry errors (`InvalidAngle`, `DegenerateVector`, `OppositeSide`) mean an
/// invariant upstream is broken. They are reported, never retried.
/// Crashing into a wall is not an error; see [`crate::sim::PointState`].
#[derive(Debug, Error)]
pub enum CaveError {
    /// An edge radius was queried outside the edge's angular range `[phi_b, phi_a)`.
    #[error("angle {phi} outside edge range [{start}, {end})")]
    InvalidAngle { phi: f64, start: f64, end: f64 },

    /// A zero-length vector was passed where a direction is required.
    #[error("degenerate vector: zero length")]
    DegenerateVector,

    /// A point lies on the far side of a segment's circle.
    #[error("point at angle {phi} lies opposite the segment")]
    OppositeSide { phi: f64 },

    /// The generator configuration violates its preconditions.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
