pub mod circle;
pub mod decomposition;
pub mod line_segment;
pub mod polygon;

pub use circle::Circle;
pub use line_segment::LineSegment;
pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// The geometric shape of a body, in body-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Line(LineSegment),
    Polygon(Polygon),
}

impl Shape {
    /// Circles and lines are always convex; polygons report their own flag.
    pub fn is_convex(&self) -> bool {
        match self {
            Shape::Circle(_) | Shape::Line(_) => true,
            Shape::Polygon(polygon) => polygon.is_convex(),
        }
    }
}
