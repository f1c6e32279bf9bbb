//! Shape-pair dispatch and aggregation of per-part results.
//!
//! Concave polygons are tested as the set of their convex parts. The results
//! of every colliding part pair are folded into one [`Penetration`].

use crate::collision::detection::{
    test_circle_circle, test_circle_polygon, test_polygon_circle, test_polygon_polygon,
};
use crate::collision::geometry::{all_points_in_circle, all_points_in_polygon};
use crate::collision::response::Penetration;
use crate::math::vec2::Vec2;
use crate::objects::Body;
use crate::shapes::Shape;

/// World-space geometry of a body, classified for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Circle { center: Vec2, radius: f64 },
    /// Convex polygon, or a line as a two-point outline.
    Convex(Vec<Vec2>),
    Concave { outline: Vec<Vec2>, parts: Vec<Vec<Vec2>> },
}

impl Geometry {
    pub fn of(body: &Body) -> Self {
        match &body.shape {
            Shape::Circle(circle) => Geometry::Circle { center: body.position, radius: circle.radius },
            Shape::Line(_) => Geometry::Convex(body.world_points()),
            Shape::Polygon(polygon) if polygon.is_convex() => Geometry::Convex(body.world_points()),
            Shape::Polygon(_) => Geometry::Concave {
                outline: body.world_points(),
                parts: body.world_convex_parts(),
            },
        }
    }

    pub fn is_concave(&self) -> bool {
        matches!(self, Geometry::Concave { .. })
    }

    /// Convex pieces to test against; a circle is its own single piece.
    fn pieces(&self) -> Vec<Piece<'_>> {
        match self {
            Geometry::Circle { center, radius } => vec![Piece::Circle(*center, *radius)],
            Geometry::Convex(points) => vec![Piece::Convex(points.as_slice())],
            Geometry::Concave { parts, .. } => parts.iter().map(|p| Piece::Convex(p.as_slice())).collect(),
        }
    }

    /// `true` when every vertex of `points` lies inside or on this geometry.
    fn contains_points(&self, points: &[Vec2]) -> bool {
        match self {
            Geometry::Circle { center, radius } => all_points_in_circle(points, *center, *radius),
            Geometry::Convex(outline) | Geometry::Concave { outline, .. } => {
                all_points_in_polygon(points, outline)
            }
        }
    }

    fn outline(&self) -> &[Vec2] {
        match self {
            Geometry::Circle { .. } => &[],
            Geometry::Convex(outline) | Geometry::Concave { outline, .. } => outline.as_slice(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece<'a> {
    Circle(Vec2, f64),
    Convex(&'a [Vec2]),
}

fn test_pieces(a: Piece<'_>, b: Piece<'_>) -> Option<Penetration> {
    match (a, b) {
        (Piece::Circle(ca, ra), Piece::Circle(cb, rb)) => test_circle_circle(ca, ra, cb, rb),
        (Piece::Circle(center, radius), Piece::Convex(points)) => test_circle_polygon(center, radius, points),
        (Piece::Convex(points), Piece::Circle(center, radius)) => test_polygon_circle(points, center, radius),
        (Piece::Convex(pa), Piece::Convex(pb)) => test_polygon_polygon(pa, pb),
    }
}

/// Accumulates sub-test results across a part cross-product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionState {
    pub collided: bool,
    pub vector_sum: Option<Vec2>,
    pub a_in_b: bool,
    pub b_in_a: bool,
}

impl CollisionState {
    /// Folds in one sub-test result. Misses leave the state untouched.
    pub fn collided(self, sub: Option<Penetration>) -> Self {
        match sub {
            None => self,
            Some(p) => CollisionState {
                collided: true,
                vector_sum: Some(self.vector_sum.unwrap_or(Vec2::ZERO) + p.overlap_v),
                a_in_b: self.a_in_b || p.a_in_b,
                b_in_a: self.b_in_a || p.b_in_a,
            },
        }
    }
}

/// Exact test between two bodies. `overlap_v` separates `a` from `b`.
pub fn check_collision(a: &Body, b: &Body) -> Option<Penetration> {
    check_geometry(&Geometry::of(a), &Geometry::of(b))
}

pub fn check_geometry(a: &Geometry, b: &Geometry) -> Option<Penetration> {
    match (a, b) {
        (Geometry::Circle { center: ca, radius: ra }, Geometry::Circle { center: cb, radius: rb }) => {
            test_circle_circle(*ca, *ra, *cb, *rb)
        }
        (Geometry::Convex(pa), Geometry::Convex(pb)) => test_polygon_polygon(pa, pb),
        (Geometry::Circle { .. }, Geometry::Convex(_) | Geometry::Concave { .. })
        | (Geometry::Convex(_) | Geometry::Concave { .. }, Geometry::Circle { .. })
        | (Geometry::Convex(_), Geometry::Concave { .. })
        | (Geometry::Concave { .. }, Geometry::Convex(_) | Geometry::Concave { .. }) => {
            check_decomposed(a, b)
        }
    }
}

fn check_decomposed(a: &Geometry, b: &Geometry) -> Option<Penetration> {
    let pieces_b = b.pieces();
    let state = a.pieces().into_iter().fold(CollisionState::default(), |state, piece_a| {
        pieces_b
            .iter()
            .fold(state, |state, piece_b| state.collided(test_pieces(piece_a, *piece_b)))
    });

    if !state.collided {
        return None;
    }

    let (a_in_b, b_in_a) = match (a.is_concave(), b.is_concave()) {
        (true, true) => (b.contains_points(a.outline()), a.contains_points(b.outline())),
        (true, false) => (b.contains_points(a.outline()), state.b_in_a),
        (false, true) => (state.a_in_b, a.contains_points(b.outline())),
        (false, false) => (state.a_in_b, state.b_in_a),
    };

    let overlap_v = state.vector_sum.unwrap_or(Vec2::ZERO);
    Some(Penetration {
        overlap_v,
        overlap_n: overlap_v.normalize(),
        overlap: overlap_v.magnitude(),
        a_in_b,
        b_in_a,
    })
}
