//! # Procedural Geometry Generation
//!
//! CPU-side mesh data and the UV sphere generator used for every body in the
//! solar system. Nothing in this module touches the GPU, so it can be tested
//! without a device.
//!
//! ## Usage
//!
//! ```rust
//! use orrery::gfx::geometry::generate_sphere;
//!
//! let sphere = generate_sphere(16).unwrap();
//! assert_eq!(sphere.vertex_count(), 17 * 17);
//! ```

pub mod sphere;

pub use sphere::generate_sphere;

use crate::error::{GeometryError, GeometryResult};
use crate::gfx::scene::vertex::Vertex3D;

/// Generated mesh data ready for GPU upload
///
/// Positions, normals and texture coordinates are parallel arrays: entry `i`
/// of each describes vertex `i`. Indices come in groups of three with
/// counter-clockwise winding seen from the front face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for the given vertex and index counts
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions packed as `[x0, y0, z0, x1, y1, z1, ...]`
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals packed as `[nx0, ny0, nz0, ...]`
    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Texture coordinates packed as `[u0, v0, u1, v1, ...]`
    pub fn tex_coords_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Checks that attribute arrays line up and every index is in range.
    pub fn validate(&self) -> GeometryResult<()> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count || self.tex_coords.len() != vertex_count {
            return Err(GeometryError::MismatchedAttributes {
                positions: vertex_count,
                normals: self.normals.len(),
                tex_coords: self.tex_coords.len(),
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }

        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Interleave attributes into the vertex format consumed by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.tex_coords)
            .map(|((&position, &normal), &tex_coords)| Vertex3D {
                position,
                normal,
                tex_coords,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_flat_views_match_layout() {
        let mesh = triangle();
        assert_eq!(
            mesh.positions_flat(),
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(mesh.normals_flat().len(), 9);
        assert_eq!(mesh.tex_coords_flat(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_validate_accepts_well_formed_mesh() {
        assert_eq!(triangle().validate(), Ok(()));
        assert_eq!(MeshData::new().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mut mesh = triangle();
        mesh.indices[2] = 3;
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_validate_rejects_mismatched_attributes() {
        let mut mesh = triangle();
        mesh.tex_coords.pop();
        assert!(matches!(
            mesh.validate(),
            Err(GeometryError::MismatchedAttributes { tex_coords: 2, .. })
        ));

        let mut mesh = triangle();
        mesh.indices.push(0);
        assert_eq!(mesh.validate(), Err(GeometryError::IncompleteTriangle(4)));
    }

    #[test]
    fn test_to_vertices_interleaves() {
        let vertices = triangle().to_vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[2].tex_coords, [0.0, 1.0]);
    }
}
