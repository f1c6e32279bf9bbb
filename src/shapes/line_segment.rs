use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// A zero-width segment from `a` to `b`, in body-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub a: Vec2,
    pub b: Vec2,
}

impl LineSegment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Both endpoints, in order, as a two-vertex outline.
    pub fn points(&self) -> [Vec2; 2] {
        [self.a, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_segment_points() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        let line = LineSegment::new(a, b);
        assert_eq!(line.points(), [a, b]);
    }
}
