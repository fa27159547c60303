//! Perspective camera with cached matrices for rendering and unprojection.

use crate::math::{Matrix4, Vector3};

/// A perspective projection camera.
pub struct PerspectiveCamera {
    /// Field of view in degrees.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Camera position.
    pub position: Vector3,
    /// Look-at target.
    pub target: Vector3,
    /// Up vector.
    pub up: Vector3,
    view_projection_matrix: Matrix4,
    view_projection_inverse: Matrix4,
    needs_update: bool,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(60.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vector3::new(0.0, 0.0, 10.0),
            target: Vector3::ZERO,
            up: Vector3::UP,
            view_projection_matrix: Matrix4::IDENTITY,
            view_projection_inverse: Matrix4::IDENTITY,
            needs_update: true,
        };
        camera.update_matrices();
        camera
    }

    /// Set the camera position.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.needs_update = true;
    }

    /// Set the look-at target.
    pub fn set_target(&mut self, target: Vector3) {
        self.target = target;
        self.needs_update = true;
    }

    /// Set the aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.needs_update = true;
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&mut self) -> &Matrix4 {
        if self.needs_update {
            self.update_matrices();
        }
        &self.view_projection_matrix
    }

    /// Get the inverse of the view-projection matrix (for unprojection).
    pub fn view_projection_inverse(&mut self) -> &Matrix4 {
        if self.needs_update {
            self.update_matrices();
        }
        &self.view_projection_inverse
    }

    /// Get the forward direction.
    pub fn forward(&self) -> Vector3 {
        (self.target - self.position).normalized()
    }

    fn update_matrices(&mut self) {
        let view = Matrix4::look_at(&self.position, &self.target, &self.up);
        let projection =
            Matrix4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far);
        self.view_projection_matrix = projection.multiply(&view);
        self.view_projection_inverse = self.view_projection_matrix.inverse();
        self.needs_update = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_points_at_target() {
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
        camera.set_position(Vector3::new(0.0, 0.0, 10.0));
        camera.set_target(Vector3::ZERO);
        assert!(camera.forward().approx_eq(&-Vector3::UNIT_Z, 1e-6));
    }

    #[test]
    fn test_inverse_matches_matrix() {
        let mut camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0);
        camera.set_position(Vector3::new(2.0, 3.0, 8.0));
        let vp = *camera.view_projection_matrix();
        let inv = *camera.view_projection_inverse();
        assert!(vp.multiply(&inv).approx_eq(&Matrix4::IDENTITY, 1e-3));
    }
}
