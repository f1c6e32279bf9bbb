use serde::{Deserialize, Serialize};

use super::decomposition;
use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;

/// A simple polygon (convex or concave) defined by its vertices in local space.
///
/// Convexity and the convex decomposition are computed once on construction.
/// A convex polygon decomposes to a single piece equal to its own outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polygon {
    vertices: Vec<Vec2>,
    convex: bool,
    convex_parts: Vec<Vec<Vec2>>,
}

impl Polygon {
    /// Creates a new polygon from its outline. Either winding order is accepted.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(CollisionError::TooFewVertices { count: vertices.len() });
        }
        let convex = decomposition::is_convex(&vertices);
        let convex_parts = decomposition::decompose(&vertices);
        Ok(Polygon { vertices, convex, convex_parts })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Local-space convex pieces, in decomposition order.
    pub fn convex_parts(&self) -> &[Vec<Vec2>] {
        &self.convex_parts
    }
}

/// Unit normals of each edge of a closed outline. Zero-length edges are skipped.
pub fn edge_normals(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).perpendicular().normalize())
        .filter(|normal| *normal != Vec2::ZERO)
        .collect()
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = CollisionError;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Vec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;

    const EPSILON: f64 = 1e-9;

    fn centered_square() -> Polygon {
        Polygon::new(vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_polygon_new() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let polygon = Polygon::new(vertices).unwrap();
        assert_eq!(polygon.vertices().len(), 3);
        assert!(polygon.is_convex());
        assert_eq!(polygon.convex_parts().len(), 1);
    }

    #[test]
    fn test_polygon_new_too_few_vertices() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        assert_eq!(
            Polygon::new(vertices),
            Err(CollisionError::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_polygon_concave_is_decomposed() {
        let polygon = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(1.0, 2.0),
        ])
        .unwrap();
        assert!(!polygon.is_convex());
        assert_eq!(polygon.convex_parts().len(), 2);
        let part_area: f64 = polygon
            .convex_parts()
            .iter()
            .map(|p| decomposition::signed_area_doubled(p).abs() / 2.0)
            .sum();
        let whole = decomposition::signed_area_doubled(polygon.vertices()).abs() / 2.0;
        assert!((whole - 6.0).abs() < EPSILON);
        assert!((part_area - whole).abs() < EPSILON);
    }

    #[test]
    fn test_edge_normals_unit_length() {
        let normals = edge_normals(centered_square().vertices());
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert!((n.magnitude() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_polygon_serde_round_trip_validates() {
        let json = serde_json::to_string(&centered_square()).unwrap();
        let back: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, centered_square());

        let too_small = r#"[{"x":0.0,"y":0.0},{"x":1.0,"y":0.0}]"#;
        assert!(serde_json::from_str::<Polygon>(too_small).is_err());
    }
}
