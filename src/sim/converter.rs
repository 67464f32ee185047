//! Flattening of the segment chain into cross-section point pairs
//!
//! For counter-clockwise segments the inner wall becomes side `a` and the
//! outer wall side `b`; clockwise segments swap them. Either way `a` stays
//! the left wall (seen in travel direction) across direction reversals.

use glam::DVec2;

use super::cave::{Cave, PointPair, quad_centroid};
use super::generator::CaveLayout;
use super::segment::Segment;

fn cross_section(segment: &Segment, inner: DVec2, outer: DVec2) -> PointPair {
    if segment.rotation_ccw {
        PointPair { a: inner, b: outer }
    } else {
        PointPair { a: outer, b: inner }
    }
}

/// Convert a generated layout to its runtime form.
///
/// Emits the first segment's start cross-section, then every segment's end
/// cross-section, so quad `i` spans segment `i`.
pub fn convert_cave(layout: &CaveLayout) -> Cave {
    let mut point_pairs = Vec::with_capacity(layout.segments.len() + 1);
    let mut arc_lengths = Vec::with_capacity(layout.segments.len() + 1);

    if let Some(first) = layout.segments.first() {
        point_pairs.push(cross_section(first, first.inner_edge.start, first.outer_edge.start));
        arc_lengths.push(first.previous_arc_length);
    }
    for s in &layout.segments {
        point_pairs.push(cross_section(s, s.inner_edge.end, s.outer_edge.end));
        arc_lengths.push(s.previous_arc_length + s.arc_length);
    }

    let goal_segment_index = point_pairs.len().saturating_sub(2);
    let spawn_segment_index = layout.spawn_segment_index.min(goal_segment_index);
    // An empty layout has no quads; its cave reports a crash everywhere
    let spawn_location = quad_centroid(&point_pairs, spawn_segment_index).unwrap_or_default();

    Cave::new(
        point_pairs,
        arc_lengths,
        spawn_segment_index,
        goal_segment_index,
        spawn_location,
    )
}
