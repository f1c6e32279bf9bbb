//! Convexity tests and convex decomposition of simple polygons.
//!
//! Decomposition runs in two passes: ear clipping produces triangles, then
//! neighbouring pieces that share a diagonal are merged for as long as the
//! merged piece stays convex. Every returned piece is counter-clockwise.

use crate::math::vec2::Vec2;

const EPSILON: f64 = 1e-10;

/// Twice the signed area of a closed outline. Positive for counter-clockwise.
pub fn signed_area_doubled(points: &[Vec2]) -> f64 {
    let n = points.len();
    (0..n).map(|i| points[i].cross(points[(i + 1) % n])).sum()
}

/// `true` when every turn of the outline goes the same way.
///
/// Collinear vertices are tolerated. Outlines with fewer than three points
/// (lines, degenerate input) count as convex.
pub fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 4 {
        return true;
    }

    let mut sign = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let turn = (b - a).cross(c - b);
        if turn.abs() <= EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

/// Splits an outline into convex pieces whose union is the original shape.
///
/// A convex outline comes back as a single piece equal to itself. The result
/// is never empty.
pub fn decompose(points: &[Vec2]) -> Vec<Vec<Vec2>> {
    if is_convex(points) {
        return vec![points.to_vec()];
    }

    let mut ccw = points.to_vec();
    if signed_area_doubled(&ccw) < 0.0 {
        ccw.reverse();
    }

    let triangles = ear_clip(&ccw);
    let pieces = merge_pieces(&ccw, triangles);

    let decomposed: Vec<Vec<Vec2>> = pieces
        .into_iter()
        .map(|piece| piece.into_iter().map(|i| ccw[i]).collect::<Vec<_>>())
        .filter(|piece| signed_area_doubled(piece).abs() > EPSILON)
        .collect();

    if decomposed.is_empty() {
        // Zero-area input; hand it back untouched.
        vec![points.to_vec()]
    } else {
        decomposed
    }
}

/// Inclusive point-in-triangle test for a counter-clockwise triangle.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).cross(p - a) >= -EPSILON
        && (c - b).cross(p - b) >= -EPSILON
        && (a - c).cross(p - c) >= -EPSILON
}

/// Ear clipping over a counter-clockwise outline. Returns index triples.
fn ear_clip(points: &[Vec2]) -> Vec<Vec<usize>> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = remaining[(i + m - 1) % m];
            let cur = remaining[i];
            let next = remaining[(i + 1) % m];
            let (a, b, c) = (points[prev], points[cur], points[next]);

            // reflex or collinear corners are never ears
            if (b - a).cross(c - b) <= EPSILON {
                return false;
            }
            !remaining.iter().any(|&j| {
                j != prev && j != cur && j != next && point_in_triangle(points[j], a, b, c)
            })
        });

        // Self-intersecting or fully collinear outlines have no ear left;
        // clip the first corner so the loop always terminates.
        let i = ear.unwrap_or(0);
        let prev = remaining[(i + m - 1) % m];
        let next = remaining[(i + 1) % m];
        triangles.push(vec![prev, remaining[i], next]);
        remaining.remove(i);
    }

    triangles.push(remaining);
    triangles
}

/// Joins `p` and `q` across an edge they share in opposite directions.
fn merge_across_shared_edge(p: &[usize], q: &[usize]) -> Option<Vec<usize>> {
    let (np, nq) = (p.len(), q.len());
    for k in 0..np {
        let (from, to) = (p[k], p[(k + 1) % np]);
        let Some(l) = (0..nq).find(|&l| q[l] == to && q[(l + 1) % nq] == from) else {
            continue;
        };

        let mut merged = Vec::with_capacity(np + nq - 2);
        merged.extend((0..np).map(|offset| p[(k + 1 + offset) % np]));
        merged.extend((2..nq).map(|offset| q[(l + offset) % nq]));
        return Some(merged);
    }
    None
}

/// Greedy Hertel-Mehlhorn style merging of adjacent convex pieces.
fn merge_pieces(points: &[Vec2], mut pieces: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let to_points = |piece: &[usize]| piece.iter().map(|&i| points[i]).collect::<Vec<_>>();

    loop {
        let mut merged_any = false;

        'search: for i in 0..pieces.len() {
            for j in (i + 1)..pieces.len() {
                let Some(merged) = merge_across_shared_edge(&pieces[i], &pieces[j]) else {
                    continue;
                };
                if is_convex(&to_points(&merged)) {
                    pieces[i] = merged;
                    pieces.remove(j);
                    merged_any = true;
                    break 'search;
                }
            }
        }

        if !merged_any {
            return pieces;
        }
    }
}
