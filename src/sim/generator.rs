//! Cave generation
//!
//! A constrained random walk over circles. Each step appends one short arc
//! segment on the current circle; every so often the walk switches to a new
//! circle that touches the old one at the current junction, optionally
//! reversing the turning direction. Wall radii are carried across junctions
//! so the walls stay continuous.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::angle::{in_angle_range, normalize};
use super::rng::CaveRng;
use super::segment::Segment;
use crate::config::GeneratorConfig;
use crate::error::CaveError;

/// A straight line between two points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
}

/// Generation-time cave: the segment chain plus its markers.
///
/// Segments are stored in travel order; the neighbours of segment `i` are
/// `i - 1` and `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveLayout {
    pub segments: Vec<Segment>,
    /// Segment (and quad) the player spawns in
    pub spawn_segment_index: usize,
    /// Final cross-section, inner to outer wall
    pub end_line: Line,
    pub total_arc_length: f64,
}

impl CaveLayout {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn prev(&self, index: usize) -> Option<&Segment> {
        index.checked_sub(1).and_then(|i| self.segments.get(i))
    }

    pub fn next(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index + 1)
    }
}

/// The circle the walk currently follows
#[derive(Debug, Clone, Copy)]
struct Circle {
    center: DVec2,
    radius: f64,
    ccw: bool,
}

/// Generate a cave whose centerline is at least `target_arc_length` long.
///
/// Always emits at least one segment. Overshoots the target by less than
/// one segment.
pub fn generate_cave(
    target_arc_length: f64,
    config: &GeneratorConfig,
    seed: u64,
) -> Result<CaveLayout, CaveError> {
    config.validate()?;
    let mut rng = CaveRng::new(seed);

    // Starting circle: centered at the origin, random radius and direction
    let mut circle = Circle {
        center: DVec2::ZERO,
        radius: rng.range(config.min_radius, config.max_radius),
        ccw: rng.coin(),
    };

    let mut total_arc_length = 0.0;
    let mut angle_on_circle = 0.0;
    let mut angle_budget = rng.range(config.min_angle_per_center, config.max_angle_per_center);
    let mut segments: Vec<Segment> = Vec::new();
    let mut circle_switches = 0u32;

    loop {
        if let Some(last) = segments.last() {
            let max_segment_angle = config.max_segment_arc_length / circle.radius;
            let backwards = may_go_backwards(last, max_segment_angle);

            if angle_on_circle > angle_budget || backwards {
                // Forced flip if continuing would turn back
                let flip = backwards || rng.coin();
                let new_radius = rng.range(config.min_radius, config.max_radius);
                circle = next_circle(last, new_radius, flip);

                angle_on_circle = 0.0;
                angle_budget =
                    rng.range(config.min_angle_per_center, config.max_angle_per_center);
                circle_switches += 1;

                log::trace!(
                    "Segment {}: new circle r={:.2} ccw={} (flip={}, backwards={})",
                    segments.len(),
                    circle.radius,
                    circle.ccw,
                    flip,
                    backwards
                );
            }
        }

        let segment = next_segment(&circle, segments.last(), total_arc_length, config, &mut rng)?;
        angle_on_circle += segment.enclosed_angle;
        total_arc_length += segment.arc_length;
        segments.push(segment);

        if total_arc_length >= target_arc_length {
            break;
        }
    }

    let last = &segments[segments.len() - 1];
    let end_line = Line {
        start: last.inner_edge.end,
        end: last.outer_edge.end,
    };
    let total_arc_length = last.previous_arc_length + last.arc_length;
    let spawn_segment_index = config.spawn_segment_index.min(segments.len() - 1);

    log::debug!(
        "Generated cave (seed {}): {} segments, {} circle switches, arc length {:.2}",
        rng.seed(),
        segments.len(),
        circle_switches,
        total_arc_length
    );

    Ok(CaveLayout {
        segments,
        spawn_segment_index,
        end_line,
        total_arc_length,
    })
}

/// Whether one more maximum-length segment on the current circle could turn
/// the travel heading out of the forward (+x) half-plane.
fn may_go_backwards(last: &Segment, max_segment_angle: f64) -> bool {
    let worst = last.end_heading() + last.direction() * max_segment_angle;
    !in_angle_range(1.5 * PI, FRAC_PI_2, worst)
}

/// The circle through `last`'s junction point with radius `new_radius`.
///
/// Without a flip the new center lies on the same side of the junction as
/// the old one (same turning direction); with a flip it is mirrored through
/// the junction and the direction reverses.
fn next_circle(last: &Segment, new_radius: f64, flip: bool) -> Circle {
    let junction = last.junction_point();
    let towards_center = (last.center - junction) / last.radius;
    let side = if flip { -1.0 } else { 1.0 };
    Circle {
        center: junction + towards_center * new_radius * side,
        radius: new_radius,
        ccw: last.rotation_ccw != flip,
    }
}

/// Random (inner, outer) wall radii around `radius`
fn random_wall_radii(radius: f64, config: &GeneratorConfig, rng: &mut CaveRng) -> (f64, f64) {
    let min_half = config.min_cave_diameter / 2.0;
    let max_half = config.max_cave_diameter / 2.0;
    let inner = radius - rng.range(min_half, max_half);
    let outer = radius + rng.range(min_half, max_half);
    (inner, outer)
}

/// Append one segment on `circle`, continuing from `prev`
fn next_segment(
    circle: &Circle,
    prev: Option<&Segment>,
    previous_arc_length: f64,
    config: &GeneratorConfig,
    rng: &mut CaveRng,
) -> Result<Segment, CaveError> {
    let (start_inner_r, start_outer_r, start_angle) = match prev {
        None => {
            let (inner, outer) = random_wall_radii(circle.radius, config, rng);
            // Head along +x
            let start_angle = if circle.ccw { 1.5 * PI } else { FRAC_PI_2 };
            (inner, outer, start_angle)
        }
        Some(prev) => {
            let flipped = prev.rotation_ccw != circle.ccw;
            let same_circle =
                !flipped && prev.center == circle.center && prev.radius == circle.radius;

            let (inner, outer) = if same_circle {
                (prev.inner_edge.r_end, prev.outer_edge.r_end)
            } else {
                // Keep the wall offsets from the centerline; a flip moves the
                // center to the other side, so inner and outer swap.
                let prev_inner_offset = prev.radius - prev.inner_edge.r_end;
                let prev_outer_offset = prev.outer_edge.r_end - prev.radius;
                let (inner_offset, outer_offset) = if flipped {
                    (prev_outer_offset, prev_inner_offset)
                } else {
                    (prev_inner_offset, prev_outer_offset)
                };
                (circle.radius - inner_offset, circle.radius + outer_offset)
            };

            let start_angle = if flipped {
                normalize(prev.end_angle + PI)
            } else {
                prev.end_angle
            };
            (inner, outer, start_angle)
        }
    };

    let arc_length = rng.range(config.min_segment_arc_length, config.max_segment_arc_length);
    let sign = if circle.ccw { 1.0 } else { -1.0 };
    let angle_delta = sign * arc_length / circle.radius;

    let (end_inner_r, end_outer_r) = random_wall_radii(circle.radius, config, rng);

    Segment::new(
        circle.center,
        circle.radius,
        start_angle,
        start_angle + angle_delta,
        circle.ccw,
        start_inner_r,
        start_outer_r,
        end_inner_r,
        end_outer_r,
        previous_arc_length,
    )
}
