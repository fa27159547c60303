//! UV sphere tessellation.
//!
//! Produces CPU-side attribute arrays rather than GPU buffers: blob vertices
//! deform every frame, so positions have to stay addressable on the host.

use std::f32::consts::PI;

/// CPU-side mesh attribute arrays, positions stored as consecutive x/y/z.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex positions, 3 floats per vertex.
    pub positions: Vec<f32>,
    /// Vertex normals, 3 floats per vertex.
    pub normals: Vec<f32>,
    /// Texture coordinates, 2 floats per vertex.
    pub uvs: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// A UV sphere geometry description.
pub struct SphereGeometry {
    /// Radius.
    pub radius: f32,
    /// Width segments (longitude).
    pub width_segments: u32,
    /// Height segments (latitude).
    pub height_segments: u32,
}

impl SphereGeometry {
    /// Create a new sphere geometry.
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    /// Tessellate the sphere into attribute arrays.
    pub fn build(&self) -> MeshData {
        let vertex_count = ((self.width_segments + 1) * (self.height_segments + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count * 3);
        let mut normals = Vec::with_capacity(vertex_count * 3);
        let mut uvs = Vec::with_capacity(vertex_count * 2);
        let mut indices = Vec::new();
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(self.height_segments as usize + 1);

        let mut index = 0u32;

        for iy in 0..=self.height_segments {
            let mut row = Vec::with_capacity(self.width_segments as usize + 1);
            let v = iy as f32 / self.height_segments as f32;
            let theta = v * PI;

            for ix in 0..=self.width_segments {
                let u = ix as f32 / self.width_segments as f32;
                let phi = u * PI * 2.0;

                let x = -self.radius * theta.sin() * phi.cos();
                let y = self.radius * theta.cos();
                let z = self.radius * theta.sin() * phi.sin();

                positions.extend_from_slice(&[x, y, z]);

                let len = (x * x + y * y + z * z).sqrt();
                if len > 0.0 {
                    normals.extend_from_slice(&[x / len, y / len, z / len]);
                } else {
                    normals.extend_from_slice(&[0.0, 1.0, 0.0]);
                }

                uvs.extend_from_slice(&[u, 1.0 - v]);

                row.push(index);
                index += 1;
            }

            grid.push(row);
        }

        for iy in 0..self.height_segments as usize {
            for ix in 0..self.width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                // Skip degenerate triangles at the poles.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != self.height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        MeshData {
            positions,
            normals,
            uvs,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count_matches_grid() {
        let mesh = SphereGeometry::new(1.0, 8, 6).build();
        assert_eq!(mesh.vertex_count(), 9 * 7);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.uvs.len() / 2, mesh.vertex_count());
    }

    #[test]
    fn test_all_vertices_on_sphere() {
        let radius = 2.5;
        let mesh = SphereGeometry::new(radius, 16, 12).build();
        for chunk in mesh.positions.chunks_exact(3) {
            let r = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            assert!((r - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = SphereGeometry::new(1.0, 8, 6).build();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_minimum_segments_enforced() {
        let geometry = SphereGeometry::new(1.0, 1, 1);
        assert_eq!(geometry.width_segments, 3);
        assert_eq!(geometry.height_segments, 2);
    }
}
