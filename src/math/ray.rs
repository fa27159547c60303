//! Ray type for pointer picking.

use super::{Plane, Sphere, Vector3};
use serde::{Deserialize, Serialize};

/// A ray with an origin and a (normalized) direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Vector3,
    /// Direction of the ray (should be normalized).
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub const fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Get a point at distance t along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Distance from the ray origin to a plane, or None if the ray is
    /// parallel to it or the plane lies behind the origin.
    pub fn distance_to_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(&self.direction);
        if denom.abs() < 1e-8 {
            if plane.distance_to_point(&self.origin).abs() < 1e-8 {
                Some(0.0)
            } else {
                None
            }
        } else {
            let t = -(self.origin.dot(&plane.normal) + plane.constant) / denom;
            if t >= 0.0 {
                Some(t)
            } else {
                None
            }
        }
    }

    /// Intersect with a plane, returning the intersection point.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector3> {
        self.distance_to_plane(plane).map(|t| self.at(t))
    }

    /// Intersect with a sphere, returning the distance to the nearest
    /// intersection in front of the origin.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<f32> {
        let oc = self.origin - sphere.center;
        let b = oc.dot(&self.direction);
        let c = oc.length_squared() - sphere.radius * sphere.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = -b - sqrt_d;
        let t2 = -b + sqrt_d;

        if t1 >= 0.0 {
            Some(t1)
        } else if t2 >= 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Y);
        assert!(ray.at(3.0).approx_eq(&Vector3::new(0.0, 3.0, 0.0), 1e-6));
    }

    #[test]
    fn test_plane_intersection() {
        // Ray down the -Z axis against the XY plane through the origin.
        let ray = Ray::new(Vector3::new(0.0, 0.0, 8.0), -Vector3::UNIT_Z);
        let plane = Plane::new(Vector3::UNIT_Z, 0.0);
        let hit = ray.intersect_plane(&plane).unwrap();
        assert!(hit.approx_eq(&Vector3::ZERO, 1e-6));
    }

    #[test]
    fn test_plane_behind_origin() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 8.0), Vector3::UNIT_Z);
        let plane = Plane::new(Vector3::UNIT_Z, 0.0);
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_sphere_intersection_nearest() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), -Vector3::UNIT_Z);
        let sphere = Sphere::new(Vector3::ZERO, 2.0);
        let t = ray.intersect_sphere(&sphere).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vector3::new(5.0, 0.0, 10.0), -Vector3::UNIT_Z);
        let sphere = Sphere::new(Vector3::ZERO, 2.0);
        assert!(ray.intersect_sphere(&sphere).is_none());
    }
}
