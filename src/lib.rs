//! 2D collision detection.
//!
//! A [`CollisionSystem`] owns circles, convex or concave polygons and line
//! segments, keeps their padded bounding boxes in a broad-phase
//! [`SpatialIndex`], and answers three questions: which bodies might touch
//! ([`CollisionSystem::get_potentials`]), whether two bodies intersect and by
//! how much ([`CollisionSystem::check_collision`]), and what a ray hits first
//! ([`CollisionSystem::raycast`]).

pub mod collision;
pub mod common;
pub mod error;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{Response, SpatialGrid, SpatialIndex, AABB};
pub use common::SystemConfig;
pub use error::{CollisionError, Result};
pub use math::vec2::Vec2;
pub use objects::{Body, BodyHandle, IndexState};
pub use shapes::{Circle, LineSegment, Polygon, Shape};
pub use world::{CollisionSystem, RaycastHit};
