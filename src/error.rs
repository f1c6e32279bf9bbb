//! Error types for shape construction and configuration

use thiserror::Error;

/// Errors raised while building shapes or configuring a collision system.
///
/// Collision queries themselves never fail: a miss is `false`, `None` or an
/// empty candidate list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// A polygon needs at least three vertices.
    #[error("polygon must have at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    /// Circle radius is negative or not finite.
    #[error("invalid circle radius: {0}")]
    InvalidRadius(f64),

    /// Body padding is negative or not finite.
    #[error("invalid body padding: {0}")]
    InvalidPadding(f64),

    /// Invalid system configuration
    #[error("invalid collision system configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible constructors in this crate
pub type Result<T> = std::result::Result<T, CollisionError>;
