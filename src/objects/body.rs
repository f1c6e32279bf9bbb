use crate::collision::AABB;
use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, LineSegment, Polygon, Shape};

slotmap::new_key_type! {
    /// Stable handle to a body owned by a `CollisionSystem`.
    pub struct BodyHandle;
}

/// Whether a body currently has an entry in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexState {
    #[default]
    Unindexed,
    Indexed(BodyHandle),
}

/// A collidable body: a shape placed in the world plus broad-phase bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    // Geometry
    pub shape: Shape,
    pub position: Vec2, // World position of the shape's local origin
    pub rotation: f64,  // Radians, ignored by circles

    /// Static bodies are skipped by `update()` and never probe in `check_one`.
    pub is_static: bool,
    /// Triggers report collisions but are never moved by separation.
    pub is_trigger: bool,
    /// AABB inflation margin. `None` uses the system's default padding.
    pub padding: Option<f64>,

    // Broad-phase bookkeeping, owned by the collision system
    pub(crate) bounds: AABB,
    pub(crate) index_state: IndexState,
}

impl Body {
    /// Creates a dynamic, non-trigger body with the given shape at `position`.
    pub fn new(shape: Shape, position: Vec2) -> Self {
        let mut body = Self {
            shape,
            position,
            rotation: 0.0,
            is_static: false,
            is_trigger: false,
            padding: None,
            bounds: AABB::new(position, position),
            index_state: IndexState::Unindexed,
        };
        body.bounds = body.calculate_aabb();
        body
    }

    /// Circle centred on `position`.
    pub fn circle(position: Vec2, radius: f64) -> Result<Self> {
        Ok(Self::new(Shape::Circle(Circle::new(radius)?), position))
    }

    /// Polygon whose vertices are given relative to `position`.
    pub fn polygon(position: Vec2, vertices: Vec<Vec2>) -> Result<Self> {
        Ok(Self::new(Shape::Polygon(Polygon::new(vertices)?), position))
    }

    /// Zero-width segment from `start` to `end`, positioned at `start`.
    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self::new(Shape::Line(LineSegment::new(Vec2::ZERO, end - start)), start)
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Sets this body's AABB margin. Rejects negative or non-finite values.
    pub fn with_padding(mut self, padding: f64) -> Result<Self> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(CollisionError::InvalidPadding(padding));
        }
        self.padding = Some(padding);
        Ok(self)
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self.bounds = self.calculate_aabb();
        self
    }

    pub fn is_convex(&self) -> bool {
        self.shape.is_convex()
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.index_state, IndexState::Indexed(_))
    }

    pub fn index_state(&self) -> IndexState {
        self.index_state
    }

    /// Bounds as last stored by the collision system (padded while indexed).
    pub fn aabb(&self) -> AABB {
        self.bounds
    }

    /// Maps a local-space point to world space.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + local.rotate(self.rotation)
    }

    /// World-space outline: polygon vertices, or both line endpoints.
    /// Empty for circles.
    pub fn world_points(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Circle(_) => Vec::new(),
            Shape::Line(segment) => segment.points().iter().map(|p| self.to_world(*p)).collect(),
            Shape::Polygon(polygon) => polygon.vertices().iter().map(|v| self.to_world(*v)).collect(),
        }
    }

    /// World-space convex pieces. Lines yield their two endpoints as one piece.
    pub fn world_convex_parts(&self) -> Vec<Vec<Vec2>> {
        match &self.shape {
            Shape::Circle(_) => Vec::new(),
            Shape::Line(_) => vec![self.world_points()],
            Shape::Polygon(polygon) => polygon
                .convex_parts()
                .iter()
                .map(|part| part.iter().map(|v| self.to_world(*v)).collect())
                .collect(),
        }
    }

    /// Tight (unpadded) world-space AABB of the current geometry.
    pub fn calculate_aabb(&self) -> AABB {
        match &self.shape {
            Shape::Circle(circle) => {
                let radius_vec = Vec2::new(circle.radius, circle.radius);
                AABB::new(self.position - radius_vec, self.position + radius_vec)
            }
            Shape::Line(_) | Shape::Polygon(_) => AABB::from_points(&self.world_points())
                .unwrap_or_else(|| AABB::new(self.position, self.position)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_body_circle_defaults() {
        let body = Body::circle(Vec2::new(1.0, 2.0), 3.0).unwrap();
        assert!(!body.is_static);
        assert!(!body.is_trigger);
        assert_eq!(body.padding, None);
        assert_eq!(body.index_state(), IndexState::Unindexed);
        assert!(body.is_convex());
        assert_eq!(body.aabb(), AABB::new(Vec2::new(-2.0, -1.0), Vec2::new(4.0, 5.0)));
    }

    #[test]
    fn test_body_circle_rejects_negative_radius() {
        assert!(Body::circle(Vec2::ZERO, -1.0).is_err());
    }

    #[test]
    fn test_body_line_points() {
        let body = Body::line(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert_eq!(body.position, Vec2::new(1.0, 1.0));
        assert_eq!(body.world_points(), vec![Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)]);
        assert_eq!(body.world_convex_parts().len(), 1);
        assert_eq!(body.calculate_aabb(), AABB::new(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)));
    }

    #[test]
    fn test_body_polygon_aabb_follows_position() {
        let mut body = Body::polygon(
            Vec2::new(10.0, 0.0),
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 1.0)],
        )
        .unwrap();
        assert_eq!(body.calculate_aabb(), AABB::new(Vec2::new(10.0, 0.0), Vec2::new(12.0, 1.0)));

        body.position = Vec2::new(0.0, 5.0);
        assert_eq!(body.calculate_aabb(), AABB::new(Vec2::new(0.0, 5.0), Vec2::new(2.0, 6.0)));
    }

    #[test]
    fn test_body_rotation_applies_to_vertices() {
        let body = Body::polygon(
            Vec2::ZERO,
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 1.0), Vec2::new(0.0, 1.0)],
        )
        .unwrap()
        .with_rotation(FRAC_PI_2);

        let aabb = body.aabb();
        assert_abs_diff_eq!(aabb.min.x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.min.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_body_builders() {
        let body = Body::circle(Vec2::ZERO, 1.0)
            .unwrap()
            .with_static(true)
            .with_trigger(true)
            .with_padding(0.25)
            .unwrap();
        assert!(body.is_static);
        assert!(body.is_trigger);
        assert_eq!(body.padding, Some(0.25));
    }

    #[test]
    fn test_body_with_padding_rejects_invalid() {
        let body = Body::circle(Vec2::ZERO, 1.0).unwrap();
        assert_eq!(body.clone().with_padding(-0.8), Err(CollisionError::InvalidPadding(-0.8)));
        assert!(body.clone().with_padding(f64::NAN).is_err());
        assert!(body.clone().with_padding(f64::INFINITY).is_err());
        assert_eq!(body.with_padding(0.0).unwrap().padding, Some(0.0));
    }
}
