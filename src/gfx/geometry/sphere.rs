//! # UV Sphere Generation
//!
//! Unit sphere centred at the origin with its poles on the Z axis.

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{InnerSpace, Vector3};

use super::MeshData;
use crate::error::{ConfigError, ConfigResult};

/// Default resolution used for every body in the demo
pub const DEFAULT_SPHERE_RESOLUTION: u32 = 16;

/// Largest resolution whose `(R+1)²` vertices are all addressable by `u32` indices
pub const MAX_SPHERE_RESOLUTION: u32 = 65_534;

/// Accepts resolutions in `1..=MAX_SPHERE_RESOLUTION`
pub fn check_resolution(resolution: u32) -> ConfigResult<()> {
    let vertices = resolution
        .checked_add(1)
        .and_then(|ring| ring.checked_mul(ring));
    match vertices {
        Some(_) if resolution > 0 => Ok(()),
        _ => Err(ConfigError::InvalidResolution(resolution)),
    }
}

/// Generate a UV sphere of radius 1.0 centred at the origin
///
/// `resolution` is used for both the number of sectors (longitude) and
/// stacks (latitude). Each ring holds `resolution + 1` vertices because the
/// seam vertex is duplicated so `u` runs exactly from 0.0 to 1.0.
///
/// Stack `i` sits at latitude `π/2 - i·π/resolution`, from the north pole
/// (+Z) down to the south pole (-Z). The first and last stacks emit one
/// triangle per sector instead of two, since the other one would collapse
/// onto the pole.
///
/// # Errors
/// Returns [`ConfigError::InvalidResolution`] when `resolution` is 0 or
/// above [`MAX_SPHERE_RESOLUTION`].
pub fn generate_sphere(resolution: u32) -> ConfigResult<MeshData> {
    check_resolution(resolution)?;

    let sectors = resolution;
    let stacks = resolution;
    let ring = sectors + 1;

    let vertex_count = ring as usize * (stacks as usize + 1);
    let index_count = 6 * sectors as usize * (stacks as usize - 1);
    let mut data = MeshData::with_capacity(vertex_count, index_count);

    let sector_step = 2.0 * PI / sectors as f32;
    let stack_step = PI / stacks as f32;

    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = stack_angle.cos();
        let z = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = [xy * sector_angle.cos(), xy * sector_angle.sin(), z];

            data.positions.push(position);
            data.normals
                .push(Vector3::from(position).normalize().into());
            data.tex_coords
                .push([j as f32 / sectors as f32, i as f32 / stacks as f32]);
        }
    }

    // k1--k1+1
    // |  / |
    // | /  |
    // k2--k2+1
    for i in 0..stacks {
        let mut k1 = i * ring;
        let mut k2 = k1 + ring;

        for _ in 0..sectors {
            if i != 0 {
                data.indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                data.indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPSILON: f32 = 1e-5;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        assert_eq!(
            generate_sphere(0),
            Err(ConfigError::InvalidResolution(0))
        );
    }

    #[test]
    fn test_resolution_limit() {
        assert_eq!(check_resolution(MAX_SPHERE_RESOLUTION), Ok(()));
        assert_eq!(check_resolution(1), Ok(()));
        for r in [MAX_SPHERE_RESOLUTION + 1, 65_536, u32::MAX] {
            assert_eq!(generate_sphere(r), Err(ConfigError::InvalidResolution(r)));
        }
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        for r in 1..=32u32 {
            let sphere = generate_sphere(r).unwrap();
            let expected_vertices = ((r + 1) * (r + 1)) as usize;
            assert_eq!(sphere.vertex_count(), expected_vertices, "resolution {r}");
            assert_eq!(sphere.normals.len(), expected_vertices);
            assert_eq!(sphere.tex_coords.len(), expected_vertices);

            let expected_triangles = (2 * r * r - 2 * r) as usize;
            assert_eq!(sphere.triangle_count(), expected_triangles, "resolution {r}");
        }
    }

    #[test]
    fn test_resolution_one_has_no_triangles() {
        let sphere = generate_sphere(1).unwrap();
        assert_eq!(sphere.vertex_count(), 4);
        assert!(sphere.indices.is_empty());
    }

    #[test]
    fn test_indices_in_range() {
        let mut rng = rand::rng();
        for _ in 0..16 {
            let r = rng.random_range(1..=64u32);
            let sphere = generate_sphere(r).unwrap();
            let limit = (r + 1) * (r + 1);
            assert!(sphere.indices.iter().all(|&i| i < limit), "resolution {r}");
            assert_eq!(sphere.validate(), Ok(()));
        }
    }

    #[test]
    fn test_normals_are_unit_and_match_positions() {
        let sphere = generate_sphere(DEFAULT_SPHERE_RESOLUTION).unwrap();
        for (p, n) in sphere.positions.iter().zip(&sphere.normals) {
            let length = dot(*n, *n).sqrt();
            assert!((length - 1.0).abs() < EPSILON, "normal length {length}");

            let p_length = dot(*p, *p).sqrt();
            for axis in 0..3 {
                assert!((n[axis] - p[axis] / p_length).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_poles_and_ring_layout() {
        let r = 8;
        let sphere = generate_sphere(r).unwrap();
        let ring = (r + 1) as usize;

        let north = sphere.positions[0];
        assert!(north[2] > 1.0 - EPSILON);
        let south = sphere.positions[ring * r as usize];
        assert!(south[2] < -1.0 + EPSILON);

        // first point of every ring lies at sector angle 0 (x >= 0, y == 0)
        for i in 0..=r as usize {
            let p = sphere.positions[i * ring];
            assert!(p[0] >= -EPSILON);
            assert!(p[1].abs() < EPSILON);
        }
    }

    #[test]
    fn test_texture_seam_wraps_exactly() {
        let r = 12;
        let sphere = generate_sphere(r).unwrap();
        let ring = (r + 1) as usize;

        for i in 0..=r as usize {
            let first = sphere.tex_coords[i * ring];
            let last = sphere.tex_coords[i * ring + r as usize];
            assert_eq!(first[0], 0.0);
            assert_eq!(last[0], 1.0);
            assert_eq!(first[1], i as f32 / r as f32);
            assert_eq!(first[1], last[1]);
        }
        assert_eq!(sphere.tex_coords[0][1], 0.0);
        assert_eq!(sphere.tex_coords[ring * r as usize][1], 1.0);
    }

    #[test]
    fn test_winding_faces_outward() {
        let sphere = generate_sphere(DEFAULT_SPHERE_RESOLUTION).unwrap();
        for [a, b, c] in sphere.triangles() {
            let p0 = sphere.positions[a as usize];
            let p1 = sphere.positions[b as usize];
            let p2 = sphere.positions[c as usize];

            let face_normal = cross(sub(p1, p0), sub(p2, p0));
            let centroid = [
                (p0[0] + p1[0] + p2[0]) / 3.0,
                (p0[1] + p1[1] + p2[1]) / 3.0,
                (p0[2] + p1[2] + p2[2]) / 3.0,
            ];
            assert!(
                dot(face_normal, centroid) > 0.0,
                "triangle ({a}, {b}, {c}) is wound inward"
            );
        }
    }

    #[test]
    fn test_pole_triangles_are_skipped() {
        let r = 6u32;
        let sphere = generate_sphere(r).unwrap();
        let ring = r + 1;

        // the north pole ring only contributes (k1+1, k2, k2+1)
        let north_ring: Vec<[u32; 3]> = sphere
            .triangles()
            .filter(|t| t.iter().any(|&i| i < ring))
            .collect();
        assert_eq!(north_ring.len(), r as usize);
        assert!(north_ring.iter().all(|t| t[0] < ring && t[1] >= ring));
    }
}
