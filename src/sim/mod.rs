//! Deterministic cave simulation
//!
//! Everything here is pure and deterministic:
//! - Seeded RNG only
//! - Generation draws in a fixed order
//! - No rendering or platform dependencies
//!
//! Pipeline: seed + config -> `generator` (segment chain) -> `converter`
//! (point pairs) -> `cave` (point location, ticked by `session`).

pub mod angle;
pub mod cave;
pub mod converter;
pub mod edge;
pub mod generator;
pub mod rng;
pub mod segment;
pub mod session;

pub use angle::{AnglePosition, angle_between, angle_between_vectors, get_angle_position, in_angle_range, normalize};
pub use cave::{Cave, PointPair, PointState, point_in_convex_quad, quad_centroid};
pub use converter::convert_cave;
pub use edge::Edge;
pub use generator::{CaveLayout, Line, generate_cave};
pub use rng::CaveRng;
pub use segment::{Segment, SegmentPosition};
pub use session::{GamePhase, Session};
