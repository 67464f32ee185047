//! Runtime cave and point location
//!
//! The corridor is a strip of cross-sections:
//!
//! ```text
//! A0------A1------A2----...
//! |       |       |
//! | quad 0| quad 1|   inside the cave
//! |       |       |
//! B0------B1------B2----...
//! ```
//!
//! Quad `i` is `(pair[i].a, pair[i].b, pair[i + 1].b, pair[i + 1].a)`. A
//! cursor remembers the quad that last contained the tracked point, so each
//! lookup only tests a few quads around it instead of scanning the cave.

use std::ops::Range;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::converter::convert_cave;
use super::generator::generate_cave;
use crate::config::{GameConfig, GeneratorConfig};
use crate::consts::{QUAD_EPSILON, SEGMENT_CHECK_ORDER};
use crate::error::CaveError;

/// One flattened cross-section of the tunnel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPair {
    /// Point on the left wall (in travel direction)
    pub a: DVec2,
    /// Point on the right wall
    pub b: DVec2,
}

impl PointPair {
    pub fn midpoint(&self) -> DVec2 {
        (self.a + self.b) / 2.0
    }

    /// Corridor width at this cross-section
    pub fn width(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// Result of a point lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointState {
    /// Inside the corridor
    Inside,
    /// Hit a wall, or moved too far since the last lookup
    Crash,
    /// Inside the goal quad
    Finish,
}

/// Signed area test of `p1` against the directed line `p3 -> p2`
#[inline]
fn collision_sign(p1: DVec2, p2: DVec2, p3: DVec2) -> f64 {
    (p1 - p3).perp_dot(p2 - p3)
}

/// Whether `p` lies inside the convex quad `a, b, c, d` (given in either
/// winding order). Points within `QUAD_EPSILON` of an edge count as inside.
pub fn point_in_convex_quad(p: DVec2, a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let edges = [(a, b), (b, c), (c, d), (d, a)];
    let mut all_pos = true;
    let mut all_neg = true;
    for (from, to) in edges {
        // Scale the tolerance so it is a distance from the edge line
        let tol = QUAD_EPSILON * from.distance(to);
        let s = collision_sign(p, from, to);
        all_pos &= s >= -tol;
        all_neg &= s <= tol;
    }
    all_pos || all_neg
}

/// Mean of the four corners of quad `index`
pub fn quad_centroid(point_pairs: &[PointPair], index: usize) -> Option<DVec2> {
    let p1 = point_pairs.get(index)?;
    let p2 = point_pairs.get(index + 1)?;
    Some((p1.a + p1.b + p2.a + p2.b) / 4.0)
}

/// Runtime cave: the flattened corridor plus the tracking cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cave {
    point_pairs: Vec<PointPair>,
    /// Cumulative centerline arc length at each cross-section
    arc_lengths: Vec<f64>,
    /// Quad that last contained the tracked point
    current_segment_index: usize,
    spawn_segment_index: usize,
    goal_segment_index: usize,
    spawn_location: DVec2,
}

impl Cave {
    pub fn new(
        point_pairs: Vec<PointPair>,
        arc_lengths: Vec<f64>,
        spawn_segment_index: usize,
        goal_segment_index: usize,
        spawn_location: DVec2,
    ) -> Self {
        debug_assert_eq!(point_pairs.len(), arc_lengths.len());
        Self {
            point_pairs,
            arc_lengths,
            current_segment_index: spawn_segment_index,
            spawn_segment_index,
            goal_segment_index,
            spawn_location,
        }
    }

    /// Generate and flatten a fresh cave
    pub fn generate(
        target_arc_length: f64,
        config: &GeneratorConfig,
        seed: u64,
    ) -> Result<Self, CaveError> {
        let layout = generate_cave(target_arc_length, config, seed)?;
        let cave = convert_cave(&layout);
        log::info!(
            "Cave ready (seed {}): {} quads, spawn {}, goal {}",
            seed,
            cave.num_quads(),
            cave.spawn_segment_index,
            cave.goal_segment_index
        );
        Ok(cave)
    }

    /// Generate a cave for a game configuration
    pub fn from_game_config(game: &GameConfig) -> Result<Self, CaveError> {
        Self::generate(game.target_arc_length(), &game.generator_config(), game.seed)
    }

    pub fn point_pairs(&self) -> &[PointPair] {
        &self.point_pairs
    }

    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc_lengths
    }

    pub fn current_segment_index(&self) -> usize {
        self.current_segment_index
    }

    pub fn spawn_segment_index(&self) -> usize {
        self.spawn_segment_index
    }

    pub fn goal_segment_index(&self) -> usize {
        self.goal_segment_index
    }

    pub fn spawn_location(&self) -> DVec2 {
        self.spawn_location
    }

    /// Number of quads (one less than the number of cross-sections)
    pub fn num_quads(&self) -> usize {
        self.point_pairs.len().saturating_sub(1)
    }

    /// Move the cursor back to spawn; the geometry is reused
    pub fn reset(&mut self) {
        self.current_segment_index = self.spawn_segment_index;
    }

    /// Corners of quad `index`, in winding order
    pub fn quad(&self, index: usize) -> Option<[DVec2; 4]> {
        let p1 = self.point_pairs.get(index)?;
        let p2 = self.point_pairs.get(index + 1)?;
        Some([p1.a, p1.b, p2.b, p2.a])
    }

    pub fn goal_quad(&self) -> Option<[DVec2; 4]> {
        self.quad(self.goal_segment_index)
    }

    fn is_in_segment(&self, p: DVec2, index: usize) -> bool {
        self.quad(index)
            .is_some_and(|[a, b, c, d]| point_in_convex_quad(p, a, b, c, d))
    }

    /// Locate `p` starting from `cursor`, without touching the stored cursor.
    ///
    /// Tests the cursor quad, then the neighbours at +1, -1, +2, -2. Returns
    /// the quad that matched (or the unchanged cursor) and the point state.
    /// Motion between lookups must stay below about one quad; a point found
    /// in none of the candidates counts as a crash.
    pub fn locate(&self, cursor: usize, p: DVec2) -> (usize, PointState) {
        for offset in SEGMENT_CHECK_ORDER {
            let Some(index) = cursor.checked_add_signed(offset) else {
                continue;
            };
            if self.is_in_segment(p, index) {
                let state = if index == self.goal_segment_index {
                    PointState::Finish
                } else {
                    PointState::Inside
                };
                return (index, state);
            }
        }
        log::trace!(
            "Point ({:.3}, {:.3}) outside quads around {}",
            p.x,
            p.y,
            cursor
        );
        (cursor, PointState::Crash)
    }

    /// Classify `p` and advance the cursor to the quad containing it.
    ///
    /// Call with every authoritative position update; skipped updates make
    /// spurious crashes more likely.
    pub fn get_point_state(&mut self, p: DVec2) -> PointState {
        let (cursor, state) = self.locate(self.current_segment_index, p);
        self.current_segment_index = cursor;
        state
    }

    /// Fraction of the centerline between spawn and goal covered by the
    /// cursor, measured in arc length at quad granularity, in [0, 1]
    pub fn progress(&self) -> f64 {
        let arc = |i: usize| self.arc_lengths.get(i).copied().unwrap_or(0.0);
        let spawn = arc(self.spawn_segment_index);
        let span = arc(self.goal_segment_index) - spawn;
        if span <= 0.0 {
            return 1.0;
        }
        ((arc(self.current_segment_index) - spawn) / span).clamp(0.0, 1.0)
    }

    /// Quads within `behind`/`ahead` of the cursor (for drawing)
    pub fn visible_range(&self, behind: usize, ahead: usize) -> Range<usize> {
        let start = self.current_segment_index.saturating_sub(behind);
        let end = self
            .current_segment_index
            .saturating_add(ahead)
            .saturating_add(1)
            .min(self.num_quads());
        start..end.max(start)
    }

    /// Closed polygon around the given quads: the `a` wall forwards, then
    /// the `b` wall backwards
    pub fn outline(&self, quads: Range<usize>) -> Vec<DVec2> {
        let end = quads.end.saturating_add(1).min(self.point_pairs.len());
        let Some(pairs) = self.point_pairs.get(quads.start..end) else {
            return Vec::new();
        };
        pairs
            .iter()
            .map(|pair| pair.a)
            .chain(pairs.iter().rev().map(|pair| pair.b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::CaveLayout;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Straight corridor along +x, 2 units wide, `n` quads
    fn straight_cave(n: usize, spawn: usize) -> Cave {
        let pairs: Vec<PointPair> = (0..=n)
            .map(|i| PointPair {
                a: DVec2::new(i as f64, 1.0),
                b: DVec2::new(i as f64, -1.0),
            })
            .collect();
        let arcs = (0..=n).map(|i| i as f64).collect();
        let spawn_location = quad_centroid(&pairs, spawn).unwrap();
        Cave::new(pairs, arcs, spawn, n - 1, spawn_location)
    }

    fn scenario() -> (CaveLayout, Cave) {
        let layout =
            generate_cave(500.0, &GeneratorConfig::default(), 12345).unwrap();
        let cave = convert_cave(&layout);
        (layout, cave)
    }

    /// Centerline point in the middle of segment `i`
    fn mid(layout: &CaveLayout, i: usize) -> DVec2 {
        layout.segments[i].centerline_point(0.5)
    }

    #[test]
    fn test_point_in_convex_quad() {
        let (a, b, c, d) = (
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(0.0, 1.0),
        );
        assert!(point_in_convex_quad(DVec2::new(1.0, 0.5), a, b, c, d));
        // Reversed winding
        assert!(point_in_convex_quad(DVec2::new(1.0, 0.5), d, c, b, a));
        // On an edge
        assert!(point_in_convex_quad(DVec2::new(1.0, 0.0), a, b, c, d));
        assert!(!point_in_convex_quad(DVec2::new(3.0, 0.5), a, b, c, d));
        assert!(!point_in_convex_quad(DVec2::new(1.0, -0.1), a, b, c, d));
    }

    #[test]
    fn test_locate_prefers_cursor_then_neighbours() {
        let cave = straight_cave(10, 3);
        assert_eq!(cave.locate(3, DVec2::new(3.5, 0.0)), (3, PointState::Inside));
        assert_eq!(cave.locate(3, DVec2::new(4.5, 0.0)), (4, PointState::Inside));
        assert_eq!(cave.locate(3, DVec2::new(1.5, 0.0)), (1, PointState::Inside));
        // Three quads away is out of the window
        assert_eq!(cave.locate(3, DVec2::new(6.5, 0.0)), (3, PointState::Crash));
        // Near the ends the window is cut off
        assert_eq!(cave.locate(0, DVec2::new(0.5, 0.0)), (0, PointState::Inside));
        assert_eq!(cave.locate(0, DVec2::new(-0.5, 0.0)), (0, PointState::Crash));
    }

    #[test]
    fn test_wall_is_crash() {
        let mut cave = straight_cave(10, 3);
        assert_eq!(cave.get_point_state(DVec2::new(3.5, 1.5)), PointState::Crash);
        assert_eq!(cave.current_segment_index(), 3);
    }

    #[test]
    fn test_goal_is_finish() {
        let mut cave = straight_cave(4, 1);
        assert_eq!(cave.get_point_state(DVec2::new(2.5, 0.0)), PointState::Inside);
        assert_eq!(cave.get_point_state(DVec2::new(3.5, 0.0)), PointState::Finish);
        assert_eq!(cave.current_segment_index(), cave.goal_segment_index());
        assert_eq!(cave.progress(), 1.0);
    }

    #[test]
    fn test_reset_restores_spawn_cursor() {
        let mut cave = straight_cave(10, 2);
        for x in [2.5, 3.5, 4.5, 5.5, 6.5] {
            cave.get_point_state(DVec2::new(x, 0.0));
        }
        assert_eq!(cave.current_segment_index(), 6);
        cave.reset();
        assert_eq!(cave.current_segment_index(), cave.spawn_segment_index());
        assert_eq!(cave.progress(), 0.0);
    }

    #[test]
    fn test_progress_is_arc_fraction() {
        let mut cave = straight_cave(10, 1);
        // spawn at arc 1, goal quad 9 at arc 9
        for x in [1.5, 2.5, 3.5, 4.5, 5.5] {
            cave.get_point_state(DVec2::new(x, 0.0));
        }
        assert!((cave.progress() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_visible_range_and_outline() {
        let cave = straight_cave(10, 2);
        assert_eq!(cave.visible_range(4, 3), 0..6);
        // Unbounded windows clamp to the cave
        assert_eq!(cave.visible_range(usize::MAX, usize::MAX), 0..10);
        let outline = cave.outline(0..2);
        assert_eq!(
            outline,
            vec![
                DVec2::new(0.0, 1.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(2.0, 1.0),
                DVec2::new(2.0, -1.0),
                DVec2::new(1.0, -1.0),
                DVec2::new(0.0, -1.0),
            ]
        );
        assert!(cave.outline(20..30).is_empty());
        assert_eq!(cave.outline(cave.visible_range(usize::MAX, usize::MAX)).len(), 22);
    }

    #[test]
    fn test_spawn_is_inside_before_any_tick() {
        let (_, mut cave) = scenario();
        let spawn = cave.spawn_location();
        assert_eq!(cave.get_point_state(spawn), PointState::Inside);
        assert_eq!(cave.current_segment_index(), cave.spawn_segment_index());
    }

    #[test]
    fn test_every_quad_centroid_is_inside() {
        let (_, cave) = scenario();
        for i in 0..cave.num_quads() {
            let centroid = quad_centroid(cave.point_pairs(), i).unwrap();
            let (cursor, state) = cave.locate(i, centroid);
            assert_eq!(cursor, i);
            assert_ne!(state, PointState::Crash);
        }
    }

    #[test]
    fn test_quads_are_convex() {
        let (_, cave) = scenario();
        for i in 0..cave.num_quads() {
            let q = cave.quad(i).unwrap();
            let signs: Vec<f64> = (0..4)
                .map(|k| (q[(k + 1) % 4] - q[k]).perp_dot(q[(k + 2) % 4] - q[(k + 1) % 4]))
                .collect();
            assert!(signs.iter().all(|s| *s > 0.0) || signs.iter().all(|s| *s < 0.0));
        }
    }

    #[test]
    fn test_reaches_finish_along_centerline() {
        let (layout, mut cave) = scenario();
        assert!(layout.total_arc_length >= 500.0);

        for i in cave.spawn_segment_index()..layout.len() {
            assert_ne!(cave.get_point_state(mid(&layout, i)), PointState::Crash);
        }
        let last = cave.point_pairs()[cave.point_pairs().len() - 1];
        assert_eq!(cave.get_point_state(last.midpoint()), PointState::Finish);
        assert_eq!(cave.progress(), 1.0);
    }

    #[test]
    fn test_forward_motion_never_moves_cursor_back() {
        let (layout, mut cave) = scenario();
        let mut last_cursor = cave.current_segment_index();
        let mut last_progress = cave.progress();
        for i in cave.spawn_segment_index()..layout.len() {
            for t in [0.25, 0.5, 0.75] {
                let state = cave.get_point_state(layout.segments[i].centerline_point(t));
                assert_ne!(state, PointState::Crash);
                assert!(cave.current_segment_index() >= last_cursor);
                assert!(cave.progress() >= last_progress);
                last_cursor = cave.current_segment_index();
                last_progress = cave.progress();
            }
        }
    }

    #[test]
    fn test_single_step_motion_never_crashes() {
        let (layout, cave) = scenario();
        let mut rng = Pcg32::seed_from_u64(4242);
        let mut cursor = cave.spawn_segment_index();
        let mut position = cursor;
        let last = layout.len() - 1;

        for _ in 0..1000 {
            position = if rng.random_bool(0.6) {
                (position + 1).min(last)
            } else {
                position.saturating_sub(1)
            };
            let (next, state) = cave.locate(cursor, mid(&layout, position));
            assert_ne!(state, PointState::Crash, "spurious crash at segment {position}");
            assert_eq!(next, position);
            cursor = next;
        }
    }

    /// How far a straight wall between two points at `wall_radius` dips
    /// towards the center at mid-segment
    fn chord_sag(wall_radius: f64, enclosed_angle: f64) -> f64 {
        wall_radius * (1.0 - libm::cos(enclosed_angle / 2.0))
    }

    #[test]
    fn test_displaced_from_centerline_crashes() {
        // Seeds 98 and 247 have inner walls that sag furthest past the arc
        let seeds = (0..20).chain([98, 247]);
        for scale in [1.0, 20.0] {
            let config = GeneratorConfig::default().scaled(scale);
            let half = config.max_cave_diameter / 2.0;
            let past_wall = half * 1.0001;

            for seed in seeds.clone() {
                let layout = generate_cave(500.0 * scale, &config, seed).unwrap();
                let cave = convert_cave(&layout);

                for (i, s) in layout.segments.iter().enumerate() {
                    let centre = s.centerline_point(0.5);
                    let outward = (centre - s.center).normalize();
                    assert_ne!(cave.locate(i, centre).1, PointState::Crash);

                    // Outer walls never leave the disc of radius r + half
                    let outside = centre + outward * past_wall;
                    assert_eq!(
                        cave.locate(i, outside).1,
                        PointState::Crash,
                        "seed {seed} scale {scale} segment {i} outwards"
                    );

                    // Inner walls are chords and may dip below r - half
                    let inward = past_wall + chord_sag(s.radius - half, s.enclosed_angle);
                    if s.radius > inward {
                        let inside = centre - outward * inward;
                        assert_eq!(
                            cave.locate(i, inside).1,
                            PointState::Crash,
                            "seed {seed} scale {scale} segment {i} inwards"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_inner_chord_sags_past_half_diameter() {
        // Seed 98, segment 102: a point just past half the diameter inwards
        // is still under the straight inner wall
        let config = GeneratorConfig::default();
        let half = config.max_cave_diameter / 2.0;
        let layout = generate_cave(500.0, &config, 98).unwrap();
        let cave = convert_cave(&layout);
        let s = &layout.segments[102];
        let centre = s.centerline_point(0.5);
        let inward = (s.center - centre).normalize();

        let p = centre + inward * half * 1.0001;
        assert_eq!(cave.locate(102, p), (102, PointState::Inside));
    }

    #[test]
    fn test_explicit_cursor_matches_mutating_lookup() {
        let (layout, mut cave) = scenario();
        let start = cave.current_segment_index();
        let p = mid(&layout, start + 1);
        let (cursor, state) = cave.locate(start, p);
        assert_eq!(cave.current_segment_index(), start);
        assert_eq!(cave.get_point_state(p), state);
        assert_eq!(cave.current_segment_index(), cursor);
    }
}
