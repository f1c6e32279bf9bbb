pub mod collision_system;
pub mod raycast;

pub use collision_system::CollisionSystem;
pub use raycast::RaycastHit;
