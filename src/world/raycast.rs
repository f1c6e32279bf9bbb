use crate::collision::geometry::{intersect_line_circle, intersect_line_polygon};
use crate::collision::narrow_phase::Geometry;
use crate::collision::SpatialIndex;
use crate::math::vec2::Vec2;
use crate::objects::{Body, BodyHandle};
use crate::world::CollisionSystem;

/// Closest surface point hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec2,
    pub collider: BodyHandle,
    /// Distance from the ray's start to `point`.
    pub distance: f64,
}

/// A temporary body that is removed from the system when dropped.
struct EphemeralBody<'a, I: SpatialIndex> {
    system: &'a mut CollisionSystem<I>,
    handle: BodyHandle,
}

impl<'a, I: SpatialIndex> EphemeralBody<'a, I> {
    fn add(system: &'a mut CollisionSystem<I>, body: Body) -> Self {
        let handle = system.add_body(body);
        EphemeralBody { system, handle }
    }
}

impl<I: SpatialIndex> Drop for EphemeralBody<'_, I> {
    fn drop(&mut self) {
        self.system.remove_body(self.handle);
    }
}

impl<I: SpatialIndex> CollisionSystem<I> {
    /// First body surface crossed by the segment `start -> end`.
    pub fn raycast(&mut self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        self.raycast_with(start, end, |_, _| true)
    }

    /// Like [`raycast`](Self::raycast), considering only bodies for which
    /// `allow` returns `true`.
    pub fn raycast_with<F>(&mut self, start: Vec2, end: Vec2, mut allow: F) -> Option<RaycastHit>
    where
        F: FnMut(BodyHandle, &Body) -> bool,
    {
        let candidates: Vec<(BodyHandle, Geometry)> = {
            let ray = EphemeralBody::add(self, Body::line(start, end));
            let system = &*ray.system;
            system
                .get_potentials(ray.handle)
                .into_iter()
                .filter_map(|handle| system.body(handle).map(|body| (handle, body)))
                .filter(|(handle, body)| allow(*handle, *body))
                .filter(|(handle, _)| system.check_collision(ray.handle, *handle).is_some())
                .map(|(handle, body)| (handle, Geometry::of(body)))
                .collect()
        };

        let mut closest: Option<RaycastHit> = None;
        for (collider, geometry) in candidates {
            let points = match &geometry {
                Geometry::Circle { center, radius } => intersect_line_circle(start, end, *center, *radius),
                Geometry::Convex(outline) | Geometry::Concave { outline, .. } => {
                    intersect_line_polygon(start, end, outline)
                }
            };

            for point in points {
                let distance = start.distance(point);
                if closest.map_or(true, |hit| distance < hit.distance) {
                    closest = Some(RaycastHit { point, collider, distance });
                }
            }
        }

        log::debug!("raycast {:?} -> {:?}: {:?}", start, end, closest);
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_raycast_hits_nearest_circle_point() {
        let mut system = CollisionSystem::new();
        let circle = system.add_body(Body::circle(Vec2::new(5.0, 0.0), 1.0).unwrap());

        let hit = system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(hit.collider, circle);
        assert_abs_diff_eq!(hit.point.x, 4.0, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.point.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.distance, 4.0, epsilon = EPSILON);
    }

    #[test]
    fn test_raycast_empty_system() {
        let mut system = CollisionSystem::new();
        assert!(system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0)).is_none());
        assert!(system.is_empty());
    }

    #[test]
    fn test_raycast_removes_ray_body() {
        let mut system = CollisionSystem::new();
        system.add_body(Body::circle(Vec2::new(5.0, 0.0), 1.0).unwrap());

        system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0));
        system.raycast(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0));

        assert_eq!(system.len(), 1);
        assert_eq!(system.index().len(), 1);
    }

    #[test]
    fn test_raycast_picks_closest_body() {
        let mut system = CollisionSystem::new();
        system.add_body(Body::circle(Vec2::new(8.0, 0.0), 1.0).unwrap());
        let square = system.add_body(
            Body::polygon(
                Vec2::new(3.0, -1.0),
                vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)],
            )
            .unwrap(),
        );

        let hit = system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(hit.collider, square);
        assert_abs_diff_eq!(hit.point.x, 3.0, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.point.y, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_raycast_predicate_filters_colliders() {
        let mut system = CollisionSystem::new();
        let near = system.add_body(Body::circle(Vec2::new(3.0, 0.0), 1.0).unwrap());
        let far = system.add_body(Body::circle(Vec2::new(8.0, 0.0), 1.0).unwrap().with_trigger(true));

        let hit = system.raycast_with(Vec2::ZERO, Vec2::new(10.0, 0.0), |handle, _| handle != near).unwrap();
        assert_eq!(hit.collider, far);
        assert_abs_diff_eq!(hit.point.x, 7.0, epsilon = EPSILON);

        let only_static = |_: BodyHandle, body: &Body| body.is_static;
        assert!(system.raycast_with(Vec2::ZERO, Vec2::new(10.0, 0.0), only_static).is_none());
    }

    #[test]
    fn test_raycast_misses_body_beside_the_ray() {
        let mut system = CollisionSystem::new();
        system.add_body(Body::circle(Vec2::new(5.0, 3.0), 1.0).unwrap());
        assert!(system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0)).is_none());
    }

    #[test]
    fn test_raycast_through_concave_polygon() {
        let mut system = CollisionSystem::new();
        let l = system.add_body(
            Body::polygon(
                Vec2::new(2.0, -1.0),
                vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(2.0, 0.0),
                    Vec2::new(2.0, 1.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(1.0, 2.0),
                    Vec2::new(0.0, 2.0),
                ],
            )
            .unwrap(),
        );

        // along y = 0.5 the ray enters the upper arm at x = 2
        let hit = system.raycast(Vec2::new(0.0, 0.5), Vec2::new(10.0, 0.5)).unwrap();
        assert_eq!(hit.collider, l);
        assert_abs_diff_eq!(hit.point.x, 2.0, epsilon = EPSILON);

        // from the right, the first edge crossed is the notch wall at x = 3
        let back = system.raycast(Vec2::new(10.0, 0.5), Vec2::new(0.0, 0.5)).unwrap();
        assert_abs_diff_eq!(back.point.x, 3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_raycast_panicking_predicate_still_removes_ray() {
        let mut system = CollisionSystem::new();
        system.add_body(Body::circle(Vec2::new(5.0, 0.0), 1.0).unwrap());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            system.raycast_with(Vec2::ZERO, Vec2::new(10.0, 0.0), |_, _| panic!("predicate failed"))
        }));
        assert!(result.is_err());
        assert_eq!(system.len(), 1);
        assert_eq!(system.index().len(), 1);
    }

    #[test]
    fn test_raycast_entry_at_shared_vertex() {
        let mut system = CollisionSystem::new();
        let outline = vec![Vec2::new(2.0, 0.0), Vec2::new(3.0, -1.0), Vec2::new(4.0, 0.0), Vec2::new(3.0, 1.0)];
        let diamond = system.add_body(Body::polygon(Vec2::ZERO, outline.clone()).unwrap());

        // both edges meeting at (2, 0) report the same crossing
        let crossings = intersect_line_polygon(Vec2::ZERO, Vec2::new(10.0, 0.0), &outline);
        assert_eq!(crossings.iter().filter(|p| **p == Vec2::new(2.0, 0.0)).count(), 2);

        let hit = system.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(hit.collider, diamond);
        assert_eq!(hit.point, Vec2::new(2.0, 0.0));
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = EPSILON);
    }
}
