//! Arc-shaped tunnel slices
//!
//! A segment follows a circular arc (center, radius, angular span) and is
//! bounded by two walls whose radius varies continuously with the angle:
//! - inner wall: towards the circle center
//! - outer wall: away from it
//!
//! Segments only ever span short arcs (at most π).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::{AnglePosition, angle_between, get_angle_position, normalize};
use super::edge::Edge;
use crate::error::CaveError;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Where a point lies relative to one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPosition {
    /// Behind the segment's span, against the travel direction
    Before,
    /// Past the segment's span
    After,
    /// Within the span, between the walls
    Inside,
    /// Within the span, beyond one of the walls
    Wall,
}

/// One arc-shaped slice of the tunnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Center of the circle this segment follows
    pub center: DVec2,
    /// Centerline radius
    pub radius: f64,
    /// Start angle (normalized)
    pub start_angle: f64,
    /// End angle (normalized)
    pub end_angle: f64,
    /// Whether the segment is traversed counter-clockwise
    pub rotation_ccw: bool,
    /// Short angular span between start and end, in (0, π]
    pub enclosed_angle: f64,
    /// Centerline arc length
    pub arc_length: f64,
    /// Sum of the arc lengths of all earlier segments
    pub previous_arc_length: f64,
    pub inner_edge: Edge,
    pub outer_edge: Edge,
    /// Mean of the four boundary points
    pub centroid: DVec2,
}

impl Segment {
    /// Build a segment from raw angles. Boundary radii are given in the
    /// segment's own start/end order, never swapped for direction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        center: DVec2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        rotation_ccw: bool,
        start_inner_r: f64,
        start_outer_r: f64,
        end_inner_r: f64,
        end_outer_r: f64,
        previous_arc_length: f64,
    ) -> Result<Self, CaveError> {
        let start_angle = normalize(start_angle);
        let end_angle = normalize(end_angle);
        let enclosed_angle = angle_between(start_angle, end_angle);

        let inner_edge = Edge::new(
            center,
            start_angle,
            end_angle,
            rotation_ccw,
            start_inner_r,
            end_inner_r,
        )?;
        let outer_edge = Edge::new(
            center,
            start_angle,
            end_angle,
            rotation_ccw,
            start_outer_r,
            end_outer_r,
        )?;
        let centroid =
            (inner_edge.start + inner_edge.end + outer_edge.start + outer_edge.end) / 4.0;

        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            rotation_ccw,
            enclosed_angle,
            arc_length: radius * enclosed_angle,
            previous_arc_length,
            inner_edge,
            outer_edge,
            centroid,
        })
    }

    /// Rotation sign: +1 for CCW, -1 for CW
    #[inline]
    pub fn direction(&self) -> f64 {
        if self.rotation_ccw { 1.0 } else { -1.0 }
    }

    /// Point on the circle at the segment end (where the next segment joins)
    pub fn junction_point(&self) -> DVec2 {
        polar_to_cartesian(self.center, self.radius, self.end_angle)
    }

    /// Point on the centerline at fraction `t` (0 = start, 1 = end)
    pub fn centerline_point(&self, t: f64) -> DVec2 {
        let phi = self.start_angle + self.direction() * self.enclosed_angle * t;
        polar_to_cartesian(self.center, self.radius, phi)
    }

    /// Travel direction at the segment end, as a polar angle
    pub fn end_heading(&self) -> f64 {
        normalize(self.end_angle + self.direction() * std::f64::consts::FRAC_PI_2)
    }

    /// Cumulative centerline arc length at polar angle `phi` (around this
    /// segment's center)
    pub fn arc_length_at(&self, phi: f64) -> f64 {
        self.previous_arc_length
            + self.arc_length * angle_between(phi, self.start_angle) / self.enclosed_angle
    }

    /// Classify a point against this segment.
    ///
    /// A point on the far side of the circle means the caller lost track of
    /// the corridor; that is reported as `OppositeSide`.
    pub fn get_point_position(&self, p: DVec2) -> Result<SegmentPosition, CaveError> {
        let (r, phi) = cartesian_to_polar(p, self.center);
        match get_angle_position(phi, self.start_angle, self.end_angle, self.rotation_ccw) {
            AnglePosition::Inside => {
                let inner_r = self.inner_edge.r(phi)?;
                let outer_r = self.outer_edge.r(phi)?;
                if inner_r <= r && r <= outer_r {
                    Ok(SegmentPosition::Inside)
                } else {
                    Ok(SegmentPosition::Wall)
                }
            }
            AnglePosition::Before => Ok(SegmentPosition::Before),
            AnglePosition::After => Ok(SegmentPosition::After),
            AnglePosition::Opposite => {
                log::error!(
                    "Point ({:.3}, {:.3}) opposite segment at ({:.3}, {:.3})",
                    p.x,
                    p.y,
                    self.center.x,
                    self.center.y
                );
                Err(CaveError::OppositeSide { phi })
            }
        }
    }
}
