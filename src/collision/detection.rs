//! Exact tests between convex world-space primitives.
//!
//! Polygons are given as world-space outlines in either winding order; a
//! two-point outline is a line segment. Every test returns `None` when the
//! shapes are separated. Touching shapes collide with zero overlap.

use crate::collision::geometry::all_points_in_circle;
use crate::collision::response::Penetration;
use crate::math::vec2::Vec2;
use crate::shapes::polygon::edge_normals;

/// Projection of a shape onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    fn of_points(points: &[Vec2], axis: Vec2) -> Self {
        points.iter().fold(
            Interval { min: f64::INFINITY, max: f64::NEG_INFINITY },
            |acc, p| {
                let d = p.dot(axis);
                Interval { min: acc.min.min(d), max: acc.max.max(d) }
            },
        )
    }

    fn of_circle(center: Vec2, radius: f64, axis: Vec2) -> Self {
        let d = center.dot(axis);
        Interval { min: d - radius, max: d + radius }
    }

    fn within(&self, other: &Interval) -> bool {
        self.min >= other.min && self.max <= other.max
    }
}

/// Running minimum over the axes tested so far.
#[derive(Debug, Clone, Copy)]
struct SatState {
    overlap: f64,
    normal: Vec2,
    a_in_b: bool,
    b_in_a: bool,
}

impl SatState {
    fn new() -> Self {
        SatState { overlap: f64::INFINITY, normal: Vec2::ZERO, a_in_b: true, b_in_a: true }
    }

    /// Folds one axis in. Returns `false` if the axis separates the shapes.
    fn test_axis(&mut self, axis: Vec2, a: Interval, b: Interval) -> bool {
        if a.min > b.max || b.min > a.max {
            return false;
        }

        self.a_in_b &= a.within(&b);
        self.b_in_a &= b.within(&a);

        // Signed overlap: positive pushes `a` back along -axis, negative along +axis.
        let overlap = if a.min < b.min && a.max < b.max {
            a.max - b.min
        } else if a.min >= b.min && a.max > b.max {
            a.min - b.max
        } else {
            // one interval contains the other
            let forward = a.max - b.min;
            let backward = b.max - a.min;
            if forward < backward {
                forward
            } else {
                -backward
            }
        };

        if overlap.abs() < self.overlap {
            self.overlap = overlap.abs();
            self.normal = if overlap < 0.0 { -axis } else { axis };
        }
        true
    }

    fn finish(self) -> Penetration {
        Penetration::new(self.normal, self.overlap, self.a_in_b, self.b_in_a)
    }
}

/// Circle `a` against circle `b`.
pub fn test_circle_circle(center_a: Vec2, radius_a: f64, center_b: Vec2, radius_b: f64) -> Option<Penetration> {
    let diff = center_b - center_a;
    let dist_sq = diff.magnitude_squared();
    let radii_sum = radius_a + radius_b;

    if dist_sq > radii_sum * radii_sum {
        return None;
    }

    let distance = dist_sq.sqrt();
    let normal = if distance > 1e-10 {
        diff * (1.0 / distance)
    } else {
        // Concentric, any direction separates them.
        Vec2::UP
    };

    Some(Penetration::new(
        normal,
        radii_sum - distance,
        radius_a <= radius_b && distance <= radius_b - radius_a,
        radius_b <= radius_a && distance <= radius_a - radius_b,
    ))
}

/// Candidate separating axes of an outline. A segment also contributes its
/// own direction, or collinear segments could never be told apart.
fn separating_axes(points: &[Vec2]) -> Vec<Vec2> {
    let mut axes = edge_normals(points);
    if let [start, end] = points {
        let direction = (*end - *start).normalize();
        if direction != Vec2::ZERO {
            axes.push(direction);
        }
    }
    axes
}

/// Convex polygon `a` against convex polygon `b` by separating axes.
pub fn test_polygon_polygon(a: &[Vec2], b: &[Vec2]) -> Option<Penetration> {
    let mut state = SatState::new();
    for axis in separating_axes(a).into_iter().chain(separating_axes(b)) {
        if !state.test_axis(axis, Interval::of_points(a, axis), Interval::of_points(b, axis)) {
            return None;
        }
    }
    state.overlap.is_finite().then(|| state.finish())
}

/// Convex polygon `a` against circle `b`.
pub fn test_polygon_circle(points: &[Vec2], center: Vec2, radius: f64) -> Option<Penetration> {
    let mut axes = edge_normals(points);

    // Axis from the circle centre to the nearest vertex covers the corner regions.
    let closest_vertex = points
        .iter()
        .copied()
        .min_by(|p, q| p.distance_squared(center).total_cmp(&q.distance_squared(center)))?;
    let corner_axis = (closest_vertex - center).normalize();
    if corner_axis != Vec2::ZERO {
        axes.push(corner_axis);
    }

    let mut state = SatState::new();
    for axis in axes {
        let a = Interval::of_points(points, axis);
        let b = Interval::of_circle(center, radius, axis);
        if !state.test_axis(axis, a, b) {
            return None;
        }
    }

    if !state.overlap.is_finite() {
        // Degenerate polygon sitting on the circle's centre.
        return Some(Penetration::new(Vec2::UP, radius, all_points_in_circle(points, center, radius), false));
    }

    // Interval containment on the polygon's own normals is exact for the
    // circle; the polygon-in-circle flag needs a vertex check.
    let mut penetration = state.finish();
    penetration.a_in_b = all_points_in_circle(points, center, radius);
    Some(penetration)
}

/// Circle `a` against convex polygon `b`.
pub fn test_circle_polygon(center: Vec2, radius: f64, points: &[Vec2]) -> Option<Penetration> {
    test_polygon_circle(points, center, radius).map(Penetration::reversed)
}
