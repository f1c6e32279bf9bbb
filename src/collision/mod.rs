pub mod aabb;
pub mod detection;
pub mod geometry;
pub mod narrow_phase;
pub mod response;
pub mod spatial_grid;
pub mod spatial_index;

// Re-export key types
pub use aabb::AABB;
pub use narrow_phase::{check_collision, CollisionState, Geometry};
pub use response::{Penetration, Response};
pub use spatial_grid::SpatialGrid;
pub use spatial_index::SpatialIndex;
