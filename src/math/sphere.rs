//! Bounding sphere, used for pointer hit testing against blobs.

use super::Vector3;
use serde::{Deserialize, Serialize};

/// A sphere defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Vector3,
    /// Radius of the sphere.
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    #[inline]
    pub const fn new(center: Vector3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check whether a point lies inside or on the sphere.
    #[inline]
    pub fn contains_point(&self, point: &Vector3) -> bool {
        point.distance_to_squared(&self.center) <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let s = Sphere::new(Vector3::new(1.0, 0.0, 0.0), 2.0);
        assert!(s.contains_point(&Vector3::new(2.5, 0.0, 0.0)));
        assert!(!s.contains_point(&Vector3::new(3.5, 0.0, 0.0)));
    }
}
