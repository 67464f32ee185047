//! Angle tools on normalized radians
//!
//! Canonical angles lie in [0, 2π). Ranges are walked counter-clockwise from
//! start to end and may wrap through zero.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::CaveError;

/// Normalize an angle to [0, 2π).
///
/// Inputs must not be below -8π.
#[inline]
pub fn normalize(alpha: f64) -> f64 {
    debug_assert!(alpha >= -4.0 * TAU, "angle {alpha} below -8π");
    // fmod is exact, so the result is strictly below TAU
    (alpha + 4.0 * TAU) % TAU
}

/// Whether `phi` lies on the CCW arc from `start` to `end`.
///
/// Half-open: `start` is included, `end` is not. If both bounds normalize
/// to the same angle the range is that single angle.
pub fn in_angle_range(start: f64, end: f64, phi: f64) -> bool {
    let start = normalize(start);
    let end = normalize(end);
    let phi = normalize(phi);

    if start == end {
        phi == start
    } else if start < end {
        start <= phi && phi < end
    } else {
        // Wraps through zero
        phi < end || start <= phi
    }
}

/// The smaller angle enclosed between two polar angles, in [0, π].
/// Symmetric in its arguments.
pub fn angle_between(phi: f64, theta: f64) -> f64 {
    let phi = normalize(phi);
    let theta = normalize(theta);
    let (lo, hi) = if phi < theta { (phi, theta) } else { (theta, phi) };
    (hi - lo).min(lo + (TAU - hi)).min(PI)
}

/// The smaller angle enclosed between two vectors, in [0, π]
pub fn angle_between_vectors(a: DVec2, b: DVec2) -> Result<f64, CaveError> {
    let norm = a.length() * b.length();
    if norm == 0.0 {
        return Err(CaveError::DegenerateVector);
    }
    Ok(libm::acos((a.dot(b) / norm).clamp(-1.0, 1.0)))
}

/// Position of an angle relative to a segment's angular range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnglePosition {
    /// Within a quarter turn behind the range, against the rotation direction
    Before,
    /// Within a quarter turn past the range, along the rotation direction
    After,
    /// Inside the range
    Inside,
    /// Anywhere else: the far side of the circle
    Opposite,
}

/// Classify `phi` against the range from `range_start` to `range_end`,
/// traversed CCW if `rotation_ccw`, else CW.
pub fn get_angle_position(
    phi: f64,
    range_start: f64,
    range_end: f64,
    rotation_ccw: bool,
) -> AnglePosition {
    // A is the more counter-clockwise bound
    let (a, b) = if rotation_ccw {
        (range_end, range_start)
    } else {
        (range_start, range_end)
    };

    if in_angle_range(b, a, phi) {
        return AnglePosition::Inside;
    }

    let behind_b = in_angle_range(b - FRAC_PI_2, b, phi);
    let past_a = in_angle_range(a, a + FRAC_PI_2, phi);
    match (rotation_ccw, behind_b, past_a) {
        (true, true, _) => AnglePosition::Before,
        (true, false, true) => AnglePosition::After,
        (false, _, true) => AnglePosition::Before,
        (false, true, false) => AnglePosition::After,
        _ => AnglePosition::Opposite,
    }
}
