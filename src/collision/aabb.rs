use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, sorting the corners so that `min <= max` on both axes.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB { min: min.min(max), max: min.max(max) }
    }

    /// Inclusive overlap test: boxes that only touch along an edge overlap.
    ///
    /// Zero-height boxes (horizontal rays) must still hit boxes they pass
    /// along, so the comparison cannot be strict.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x >= other.min.x && self.min.x <= other.max.x;
        let y_overlap = self.max.y >= other.min.y && self.min.y <= other.max.y;
        x_overlap && y_overlap
    }

    /// `true` if `other` lies entirely inside this box (boundaries included).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// This box grown by `padding` on every side.
    pub fn padded(&self, padding: f64) -> AABB {
        let margin = Vec2::new(padding, padding);
        AABB { min: self.min - margin, max: self.max + margin }
    }

    /// Smallest AABB containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(AABB { min, max })
    }
}
