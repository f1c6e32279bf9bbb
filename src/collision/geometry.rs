//! Geometric helpers: segment intersections and point containment.
//!
//! All inputs are world-space points. Polygon outlines may be convex or
//! concave and in either winding order.

use crate::math::vec2::Vec2;

const EPSILON: f64 = 1e-10;

/// Point on segment `a -> b` closest to `point`, and its parameter `t` in `[0, 1]`.
pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = b - a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < 1e-12 {
        return (a, 0.0);
    }

    let t = ((point - a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (a + segment_vec * t, t)
}

/// Intersection of segments `a1 -> a2` and `b1 -> b2`.
///
/// Returns the point and the parameters `(t, u)` along each segment, endpoints
/// included. Parallel and collinear segments report no intersection.
pub fn intersect_line_segments(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(Vec2, f64, f64)> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let delta_start = b1 - a1;

    let denominator = d1.cross(d2);
    if denominator.abs() < EPSILON {
        return None;
    }

    let t = delta_start.cross(d2) / denominator;
    let u = delta_start.cross(d1) / denominator;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((a1 + d1 * t, t, u))
    } else {
        None
    }
}

/// Points where segment `start -> end` crosses the circle's boundary,
/// ordered by distance from `start`.
pub fn intersect_line_circle(start: Vec2, end: Vec2, center: Vec2, radius: f64) -> Vec<Vec2> {
    let d = end - start;
    let f = start - center;

    let a = d.dot(d);
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    if a < EPSILON {
        // Zero-length segment: a point on the circle counts as a crossing.
        return if c.abs() < EPSILON { vec![start] } else { Vec::new() };
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    let mut points = Vec::with_capacity(2);
    for t in [t1, t2] {
        if (0.0..=1.0).contains(&t) {
            let point = start + d * t;
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
    }
    points
}

/// Points where segment `start -> end` crosses any edge of the outline, in
/// edge order.
pub fn intersect_line_polygon(start: Vec2, end: Vec2, outline: &[Vec2]) -> Vec<Vec2> {
    let n = outline.len();
    (0..n)
        .filter_map(|i| intersect_line_segments(start, end, outline[i], outline[(i + 1) % n]))
        .map(|(point, _, _)| point)
        .collect()
}

/// Inclusive point-in-polygon test: points on an edge count as inside.
pub fn point_in_polygon(point: Vec2, outline: &[Vec2]) -> bool {
    let n = outline.len();
    if n == 0 {
        return false;
    }

    let on_boundary = (0..n).any(|i| {
        let (closest, _) = closest_point_on_segment(outline[i], outline[(i + 1) % n], point);
        closest.distance_squared(point) < EPSILON
    });
    if on_boundary {
        return true;
    }

    // even-odd crossing count along +x
    let mut inside = false;
    for i in 0..n {
        let vi = outline[i];
        let vj = outline[(i + n - 1) % n];
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = vi.x + (point.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Inclusive point-in-circle test.
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f64) -> bool {
    point.distance_squared(center) <= radius * radius + EPSILON
}

/// `true` when every point lies inside or on the outline.
pub fn all_points_in_polygon(points: &[Vec2], outline: &[Vec2]) -> bool {
    points.iter().all(|p| point_in_polygon(*p, outline))
}

/// `true` when every point lies inside or on the circle.
pub fn all_points_in_circle(points: &[Vec2], center: Vec2, radius: f64) -> bool {
    points.iter().all(|p| point_in_circle(*p, center, radius))
}
