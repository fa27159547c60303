//! Infinite plane, used as the blob placement surface.

use super::Vector3;
use serde::{Deserialize, Serialize};

/// An infinite plane satisfying `normal · point + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Plane {
    /// Normal vector of the plane (should be normalized).
    pub normal: Vector3,
    /// Signed distance from the origin along the normal, negated.
    pub constant: f32,
}

impl Plane {
    /// Create a new plane.
    #[inline]
    pub const fn new(normal: Vector3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Create a plane from a normal and a point it passes through.
    #[inline]
    pub fn from_normal_and_point(normal: Vector3, point: &Vector3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            constant: -point.dot(&n),
        }
    }

    /// Signed distance from a point to the plane.
    #[inline]
    pub fn distance_to_point(&self, point: &Vector3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through_point() {
        let p = Plane::from_normal_and_point(Vector3::UNIT_Z, &Vector3::new(0.0, 0.0, 4.0));
        assert!(p.distance_to_point(&Vector3::new(1.0, 2.0, 4.0)).abs() < 1e-6);
        assert!((p.distance_to_point(&Vector3::new(0.0, 0.0, 6.0)) - 2.0).abs() < 1e-6);
    }
}
