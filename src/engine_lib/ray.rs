// src/engine_lib/ray.rs

use glam::Vec3;

use super::collider::Aabb;

const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate ray that hits nothing.
    pub direction: Vec3,
}

/// Where a ray meets a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AabbHit {
    pub distance: f32,
    pub point: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against `aabb`.
    ///
    /// An origin inside the box yields a hit at distance 0 whose point lies on
    /// the face behind the origin, i.e. where the ray would have entered.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<AabbHit> {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            if dir.abs() < PARALLEL_EPSILON {
                if origin < aabb.min[axis] || origin > aabb.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (aabb.min[axis] - origin) * inv;
            let mut t1 = (aabb.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
        }

        if t_exit < t_enter || t_exit < 0.0 {
            return None;
        }

        if t_enter >= 0.0 {
            Some(AabbHit { distance: t_enter, point: self.point_at(t_enter) })
        } else {
            Some(AabbHit { distance: 0.0, point: self.point_at(t_enter) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_floor() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 0.0, 1.0))
    }

    #[test]
    fn downward_ray_hits_top_face() {
        let ray = Ray::new(Vec3::new(0.2, 0.5, -0.3), Vec3::NEG_Y);
        let hit = ray.intersect_aabb(&unit_floor()).expect("hit");
        assert_relative_eq!(hit.distance, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(hit.point.x, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn ray_beside_box_misses() {
        let ray = Ray::new(Vec3::new(1.5, 0.5, 0.0), Vec3::NEG_Y);
        assert!(ray.intersect_aabb(&unit_floor()).is_none());
    }

    #[test]
    fn box_behind_origin_is_not_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Y);
        assert!(ray.intersect_aabb(&unit_floor()).is_none());
    }

    #[test]
    fn origin_inside_reports_face_behind_at_zero_distance() {
        let ray = Ray::new(Vec3::new(0.0, -0.25, 0.0), Vec3::NEG_Y);
        let hit = ray.intersect_aabb(&unit_floor()).expect("hit");
        assert_eq!(hit.distance, 0.0);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn oblique_ray_enters_through_side() {
        let ray = Ray::new(Vec3::new(-3.0, -0.5, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = ray.intersect_aabb(&unit_floor()).expect("hit");
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-6);
        assert_relative_eq!(hit.point.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_ray_hits_nothing() {
        let ray = Ray::new(Vec3::new(0.0, -0.5, 0.0), Vec3::ZERO);
        assert!(ray.intersect_aabb(&unit_floor()).is_none());
    }
}
