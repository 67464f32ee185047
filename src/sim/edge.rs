//! Segment walls with continuously varying radius
//!
//! A wall is the straight chord between its two boundary points. Seen from
//! the segment center, the chord's distance varies smoothly with the polar
//! angle; `Edge::r` evaluates it in closed form via the law of sines in the
//! triangle (center, B, point).
//!
//! "start"/"end" follow the segment's own direction. `A` is always the more
//! counter-clockwise endpoint, `B` the more clockwise one.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::{angle_between, angle_between_vectors, in_angle_range};
use crate::error::CaveError;
use crate::polar_to_cartesian;

/// One wall (inner or outer) of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Radius at the segment's start angle (as given, never swapped)
    pub r_start: f64,
    /// Radius at the segment's end angle
    pub r_end: f64,
    /// Radius at A
    pub r_a: f64,
    /// Radius at B
    pub r_b: f64,
    /// Polar angle of A (normalized)
    pub phi_a: f64,
    /// Polar angle of B (normalized)
    pub phi_b: f64,
    /// Boundary point at the segment start
    pub start: DVec2,
    /// Boundary point at the segment end
    pub end: DVec2,
    /// The more counter-clockwise boundary point
    pub point_a: DVec2,
    /// The more clockwise boundary point
    pub point_b: DVec2,
    /// Angle at B between the chord B→A and the radius B→center, in (0, π)
    pub gamma: f64,
    /// Chord length
    pub length: f64,
}

impl Edge {
    /// Build a wall of a segment around `center`. Angles must be normalized.
    pub fn new(
        center: DVec2,
        start_angle: f64,
        end_angle: f64,
        rotation_ccw: bool,
        r_start: f64,
        r_end: f64,
    ) -> Result<Self, CaveError> {
        let start = polar_to_cartesian(center, r_start, start_angle);
        let end = polar_to_cartesian(center, r_end, end_angle);

        let (r_a, r_b, phi_a, phi_b, a, b) = if rotation_ccw {
            (r_end, r_start, end_angle, start_angle, end, start)
        } else {
            (r_start, r_end, start_angle, end_angle, start, end)
        };

        let gamma = angle_between_vectors(a - b, center - b)?;

        Ok(Self {
            r_start,
            r_end,
            r_a,
            r_b,
            phi_a,
            phi_b,
            start,
            end,
            point_a: a,
            point_b: b,
            gamma,
            length: start.distance(end),
        })
    }

    /// Wall radius at polar angle `phi`, defined on [phi_b, phi_a)
    pub fn r(&self, phi: f64) -> Result<f64, CaveError> {
        if !in_angle_range(self.phi_b, self.phi_a, phi) {
            return Err(CaveError::InvalidAngle {
                phi,
                start: self.phi_b,
                end: self.phi_a,
            });
        }
        let theta = angle_between(phi, self.phi_b);
        let delta = PI - self.gamma - theta;
        Ok(self.r_b * libm::sin(self.gamma) / libm::sin(delta))
    }

    /// Sample `num_points` wall points from B towards A (A itself excluded),
    /// using the continuous radius
    pub fn sample(&self, center: DVec2, num_points: usize) -> Result<Vec<DVec2>, CaveError> {
        let span = angle_between(self.phi_a, self.phi_b);
        (0..num_points)
            .map(|i| {
                let t = i as f64 / num_points.max(1) as f64;
                let phi = self.phi_b + t * span;
                Ok(polar_to_cartesian(center, self.r(phi)?, phi))
            })
            .collect()
    }
}
