//! A deformable blob: a UV sphere whose vertices carry spring physics.

use super::params::SharedParams;
use crate::core::BlobId;
use crate::geometry::{MeshData, SphereGeometry};
use crate::math::{Color, Sphere, Vector3};

/// Fixed tessellation for every blob (longitude and latitude segments).
/// Fixes the vertex count for the blob's lifetime; a `blob_size` change
/// affects only blobs created afterwards.
pub const BLOB_SEGMENTS: u32 = 64;

/// One deformable sphere.
///
/// Owns the mutable position buffer, an immutable rest-state snapshot and a
/// per-vertex velocity buffer, all flat `f32` arrays with x/y/z in
/// consecutive slots and index-aligned across the three buffers.
pub struct Blob {
    id: BlobId,
    positions: Vec<f32>,
    rest: Vec<f32>,
    velocities: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    /// World-space translation, mutated only while dragged.
    position: Vector3,
    size: f32,
    params: SharedParams,
    dirty: bool,
}

impl Blob {
    /// Create a blob at a world position. The radius is read from the shared
    /// parameter store at construction time and never changes afterwards.
    pub fn new(position: Vector3, params: SharedParams) -> Self {
        let size = params.borrow().blob_size;
        let MeshData {
            positions,
            normals,
            uvs,
            indices,
        } = SphereGeometry::new(size, BLOB_SEGMENTS, BLOB_SEGMENTS).build();

        let rest = positions.clone();
        let velocities = vec![0.0; positions.len()];

        Self {
            id: BlobId::new(),
            positions,
            rest,
            velocities,
            normals,
            uvs,
            indices,
            position,
            size,
            params,
            dirty: true,
        }
    }

    /// Advance the physics by one step.
    ///
    /// Every vertex gets a spring pull back toward its rest position, and --
    /// when `external` is given -- a proximity-gated pull toward that point
    /// (vertices strictly inside `mouse_radius` only). Positions integrate by
    /// explicit Euler with no damping term, so stability relies on the small
    /// parameter ranges the panel exposes. A non-finite or negative step, or
    /// a corrupted parameter store, skips the update entirely rather than
    /// poisoning the buffers.
    pub fn update(&mut self, dt: f32, external: Option<Vector3>) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }

        let (stiffness, repulsion, radius) = {
            let p = self.params.borrow();
            if !p.is_finite() {
                return;
            }
            (p.spring_stiffness, p.repulsion_force, p.mouse_radius)
        };

        let external = external.filter(|p| p.is_finite());
        let radius_sq = radius * radius;

        for i in (0..self.positions.len()).step_by(3) {
            let dx = self.positions[i] - self.rest[i];
            let dy = self.positions[i + 1] - self.rest[i + 1];
            let dz = self.positions[i + 2] - self.rest[i + 2];

            self.velocities[i] -= dx * stiffness * dt;
            self.velocities[i + 1] -= dy * stiffness * dt;
            self.velocities[i + 2] -= dz * stiffness * dt;

            if let Some(point) = external {
                let tx = point.x - (self.positions[i] + self.position.x);
                let ty = point.y - (self.positions[i + 1] + self.position.y);
                let tz = point.z - (self.positions[i + 2] + self.position.z);
                let dist_sq = tx * tx + ty * ty + tz * tz;

                if dist_sq > 0.0 && dist_sq < radius_sq {
                    let scale = repulsion * dt / dist_sq.sqrt();
                    self.velocities[i] += tx * scale;
                    self.velocities[i + 1] += ty * scale;
                    self.velocities[i + 2] += tz * scale;
                }
            }

            self.positions[i] += self.velocities[i];
            self.positions[i + 1] += self.velocities[i + 1];
            self.positions[i + 2] += self.velocities[i + 2];
        }

        self.dirty = true;
    }

    /// Unique id of this blob.
    #[inline]
    pub fn id(&self) -> BlobId {
        self.id
    }

    /// Current vertex positions (local space, 3 floats per vertex).
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Rest-state snapshot taken at construction.
    #[inline]
    pub fn rest_positions(&self) -> &[f32] {
        &self.rest
    }

    /// Per-vertex velocities.
    #[inline]
    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    /// Static vertex normals from construction.
    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Static texture coordinates from construction.
    #[inline]
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// Triangle indices.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// World-space translation.
    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Move the blob in world space (used by dragging).
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Radius the blob was built with.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// World-space bounding sphere for pointer hit testing.
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.position, self.size)
    }

    /// Current blend colors, read live from the shared parameter store.
    pub fn colors(&self) -> (Color, Color) {
        let p = self.params.borrow();
        (p.color1, p.color2)
    }

    /// Whether the GPU-side vertex buffer needs a re-upload.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the re-upload flag after the renderer has consumed the data.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::params::{shared, Params};
    use crate::math::Color;

    fn test_blob(position: Vector3, size: f32) -> Blob {
        let params = shared(Params {
            blob_size: size,
            ..Params::default()
        });
        Blob::new(position, params)
    }

    #[test]
    fn test_rest_invariant_at_construction() {
        let blob = test_blob(Vector3::ZERO, 1.0);
        assert_eq!(blob.positions(), blob.rest_positions());
        assert!(blob.velocities().iter().all(|&v| v == 0.0));
        assert_eq!(blob.positions().len(), blob.rest_positions().len());
        assert_eq!(blob.positions().len(), blob.velocities().len());
        assert_eq!(blob.vertex_count(), 65 * 65);
    }

    #[test]
    fn test_equilibrium_is_stable() {
        let mut blob = test_blob(Vector3::ZERO, 1.0);
        for _ in 0..50 {
            blob.update(0.016, None);
        }
        for (p, r) in blob.positions().iter().zip(blob.rest_positions()) {
            assert!((p - r).abs() < 1e-6);
        }
    }

    #[test]
    fn test_spring_does_not_diverge() {
        // 0.1-unit perturbation on every vertex, stiffness 0.4, dt 16 ms,
        // 1000 steps: displacement must stay bounded.
        let mut blob = test_blob(Vector3::ZERO, 1.0);
        for p in blob.positions.iter_mut() {
            *p += 0.1;
        }

        for _ in 0..1000 {
            blob.update(0.016, None);
        }

        let max_displacement = blob
            .positions()
            .iter()
            .zip(blob.rest_positions())
            .map(|(p, r)| (p - r).abs())
            .fold(0.0f32, f32::max);
        assert!(
            max_displacement < 0.5,
            "spring diverged: {max_displacement}"
        );
        assert!(blob.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_proximity_gate_is_strict() {
        // The top pole sits at (0, size, 0); an external point straight above
        // it at exactly mouse_radius distance must contribute no force.
        let params = shared(Params {
            blob_size: 1.0,
            mouse_radius: 1.5,
            repulsion_force: 1.0,
            spring_stiffness: 0.0,
            ..Params::default()
        });
        let mut blob = Blob::new(Vector3::ZERO, params);
        let pole = blob
            .positions()
            .chunks_exact(3)
            .position(|v| v[1] == 1.0 && v[0] == 0.0 && v[2] == 0.0)
            .expect("sphere has a top pole vertex");

        blob.update(0.016, Some(Vector3::new(0.0, 2.5, 0.0)));
        assert_eq!(blob.velocities()[pole * 3 + 1], 0.0);

        // Inside the radius the same vertex is pulled toward the point.
        blob.update(0.016, Some(Vector3::new(0.0, 2.0, 0.0)));
        assert!(blob.velocities()[pole * 3 + 1] > 0.0);
    }

    #[test]
    fn test_force_points_toward_external_point() {
        let params = shared(Params {
            blob_size: 1.0,
            mouse_radius: 3.0,
            repulsion_force: 2.0,
            spring_stiffness: 0.0,
            ..Params::default()
        });
        let mut blob = Blob::new(Vector3::ZERO, params);
        // Point to the right of the blob: mean x-velocity of affected
        // vertices must be positive (an attraction bulge, despite the name).
        blob.update(0.016, Some(Vector3::new(2.0, 0.0, 0.0)));
        let mean_vx: f32 = blob.velocities().chunks_exact(3).map(|v| v[0]).sum::<f32>()
            / blob.vertex_count() as f32;
        assert!(mean_vx > 0.0);
    }

    #[test]
    fn test_world_position_offsets_proximity() {
        // A blob far from the pointer target receives no force even though
        // its local coordinates would be in range.
        let params = shared(Params {
            blob_size: 1.0,
            mouse_radius: 1.5,
            spring_stiffness: 0.0,
            ..Params::default()
        });
        let mut blob = Blob::new(Vector3::new(100.0, 0.0, 0.0), params);
        blob.update(0.016, Some(Vector3::new(0.0, 0.0, 0.0)));
        assert!(blob.velocities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_finite_step_rejected() {
        let mut blob = test_blob(Vector3::ZERO, 1.0);
        let before = blob.positions().to_vec();

        blob.update(f32::NAN, Some(Vector3::new(0.5, 0.0, 0.0)));
        blob.update(f32::INFINITY, None);
        blob.update(-0.016, None);

        assert_eq!(blob.positions(), &before[..]);
    }

    #[test]
    fn test_non_finite_params_rejected() {
        let params = shared(Params::default());
        let mut blob = Blob::new(Vector3::ZERO, params.clone());
        params.borrow_mut().spring_stiffness = f32::NAN;

        blob.update(0.016, Some(Vector3::new(0.5, 0.0, 0.0)));
        assert!(blob.velocities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_finite_external_point_ignored() {
        let mut blob = test_blob(Vector3::ZERO, 1.0);
        blob.update(0.016, Some(Vector3::new(f32::NAN, 0.0, 0.0)));
        assert!(blob.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_size_read_at_construction_only() {
        let params = shared(Params {
            blob_size: 2.0,
            ..Params::default()
        });
        let blob = Blob::new(Vector3::ZERO, params.clone());
        params.borrow_mut().blob_size = 0.5;
        assert_eq!(blob.size(), 2.0);
        assert_eq!(blob.bounding_sphere().radius, 2.0);
    }

    #[test]
    fn test_colors_propagate_live() {
        let params = shared(Params::default());
        let blob = Blob::new(Vector3::ZERO, params.clone());
        params.borrow_mut().color1 = Color::from_hex(0x123456);
        let (c1, _) = blob.colors();
        assert!(c1.approx_eq(&Color::from_hex(0x123456), 1e-6));
    }

    #[test]
    fn test_update_sets_dirty() {
        let mut blob = test_blob(Vector3::ZERO, 1.0);
        blob.clear_dirty();
        blob.update(0.016, None);
        assert!(blob.is_dirty());
    }
}
