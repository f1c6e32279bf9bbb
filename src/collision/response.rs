use crate::math::vec2::Vec2;
use crate::objects::BodyHandle;

/// Result of an exact test between two world-space shapes.
///
/// `overlap_v` points from the first shape towards the second: subtracting it
/// from the first shape's position pushes the shapes apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub overlap_v: Vec2,
    pub overlap_n: Vec2,
    pub overlap: f64,
    pub a_in_b: bool,
    pub b_in_a: bool,
}

impl Penetration {
    /// Penetration along `overlap_n` with depth `overlap`.
    pub fn new(overlap_n: Vec2, overlap: f64, a_in_b: bool, b_in_a: bool) -> Self {
        Self { overlap_v: overlap_n * overlap, overlap_n, overlap, a_in_b, b_in_a }
    }

    /// The same penetration seen from the other shape.
    pub fn reversed(self) -> Self {
        Self {
            overlap_v: -self.overlap_v,
            overlap_n: -self.overlap_n,
            overlap: self.overlap,
            a_in_b: self.b_in_a,
            b_in_a: self.a_in_b,
        }
    }
}

/// Outcome of a colliding pair, returned by value from every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    /// The probing body.
    pub a: BodyHandle,
    /// The body it collided with.
    pub b: BodyHandle,
    /// Subtracting this from `a`'s position separates `a` from `b`.
    pub overlap_v: Vec2,
    /// `overlap_v` normalized.
    pub overlap_n: Vec2,
    /// Magnitude of `overlap_v`.
    pub overlap: f64,
    /// `a` lies entirely within `b`.
    pub a_in_b: bool,
    /// `b` lies entirely within `a`.
    pub b_in_a: bool,
}

impl Response {
    pub fn new(a: BodyHandle, b: BodyHandle, penetration: Penetration) -> Self {
        Self {
            a,
            b,
            overlap_v: penetration.overlap_v,
            overlap_n: penetration.overlap_n,
            overlap: penetration.overlap,
            a_in_b: penetration.a_in_b,
            b_in_a: penetration.b_in_a,
        }
    }
}
