//! Pointer tracking: screen coordinates to world-space interaction points.

use super::registry::BlobRegistry;
use crate::camera::PerspectiveCamera;
use crate::core::BlobId;
use crate::math::{Plane, Ray, Vector3};

/// Distance along the view ray at which the pointer interacts with blobs.
/// Fixed so the repulsion plane stays stable while the pointer moves.
pub const INTERACTION_DEPTH: f32 = 8.0;

/// Tracks the last-known pointer position in normalized device coordinates
/// and converts it into world-space rays and points.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerTracker {
    ndc_x: f32,
    ndc_y: f32,
}

impl PointerTracker {
    /// Create a tracker centered on the screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from screen-space pixel coordinates. Coordinates outside the
    /// viewport clamp to the valid NDC range.
    pub fn set_from_screen(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.ndc_x = ((x / width) * 2.0 - 1.0).clamp(-1.0, 1.0);
        self.ndc_y = (1.0 - (y / height) * 2.0).clamp(-1.0, 1.0);
    }

    /// Current normalized device coordinates, both in [-1, 1].
    #[inline]
    pub fn ndc(&self) -> (f32, f32) {
        (self.ndc_x, self.ndc_y)
    }

    /// Cast a world-space ray from the camera through the tracked point.
    pub fn ray(&self, camera: &mut PerspectiveCamera) -> Ray {
        let inverse = *camera.view_projection_inverse();
        let near = inverse.transform_point(&Vector3::new(self.ndc_x, self.ndc_y, 0.0));
        let far = inverse.transform_point(&Vector3::new(self.ndc_x, self.ndc_y, 1.0));
        Ray::new(near, (far - near).normalized())
    }

    /// World-space point at a fixed distance along the view ray from the
    /// camera position.
    pub fn project_to_depth(&self, camera: &mut PerspectiveCamera, distance: f32) -> Vector3 {
        let direction = self.ray(camera).direction;
        camera.position + direction * distance
    }

    /// World-space point for placing a new blob: the intersection of the
    /// pointer ray with the plane through the scene origin perpendicular to
    /// the view. Falls back to the fixed-depth point when the ray is
    /// parallel to the plane.
    pub fn placement_point(&self, camera: &mut PerspectiveCamera) -> Vector3 {
        let plane = Plane::from_normal_and_point(-camera.forward(), &Vector3::ZERO);
        let ray = self.ray(camera);
        ray.intersect_plane(&plane)
            .unwrap_or_else(|| self.project_to_depth(camera, INTERACTION_DEPTH))
    }

    /// Find the blob nearest to the camera whose bounding sphere the pointer
    /// ray intersects. An empty registry is simply no hit.
    pub fn hit_test(
        &self,
        camera: &mut PerspectiveCamera,
        registry: &BlobRegistry,
    ) -> Option<BlobId> {
        let ray = self.ray(camera);
        let mut nearest: Option<(f32, BlobId)> = None;

        for blob in registry.iter() {
            if let Some(t) = ray.intersect_sphere(&blob.bounding_sphere()) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, blob.id()));
                }
            }
        }

        nearest.map(|(_, id)| id)
    }
}
