/// Indexed triangle mesh and the UV-sphere generator
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

use crate::error::GeometryError;

/// Minimum sector count for a closed sphere
pub const MIN_SECTORS: u32 = 3;
/// Minimum stack count for a closed sphere
pub const MIN_STACKS: u32 = 2;

/// Check that a sphere resolution gives a closed, non-degenerate mesh whose
/// vertices can all be addressed by `u32` indices
pub fn validate_resolution(sector_count: u32, stack_count: u32) -> Result<(), GeometryError> {
    if sector_count < MIN_SECTORS || stack_count < MIN_STACKS {
        return Err(GeometryError::InvalidResolution {
            sectors: sector_count,
            stacks: stack_count,
        });
    }
    if sphere_vertex_count(sector_count, stack_count) > u64::from(u32::MAX) {
        return Err(GeometryError::ResolutionTooLarge {
            sectors: sector_count,
            stacks: stack_count,
        });
    }
    Ok(())
}

/// Vertices in a UV-sphere, seam column included
fn sphere_vertex_count(sector_count: u32, stack_count: u32) -> u64 {
    (u64::from(stack_count) + 1) * (u64::from(sector_count) + 1)
}

/// An indexed triangle mesh.
///
/// `normals` is index-aligned with `positions`; `indices` holds triangle
/// corners, three per triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Build a unit-radius UV-sphere, rejecting degenerate resolutions.
    pub fn try_uv_sphere(sector_count: u32, stack_count: u32) -> Result<Self, GeometryError> {
        validate_resolution(sector_count, stack_count)?;
        Ok(Self::uv_sphere(sector_count, stack_count))
    }

    /// Build a unit-radius UV-sphere.
    ///
    /// Stacks run from the +Z pole (`i = 0`) down to the -Z pole, sectors
    /// sweep longitude. Vertices are laid out row-major by (stack, sector),
    /// with a duplicated seam column at `j = sector_count`. The pole rows
    /// only emit one triangle per quad so no triangle has zero area.
    ///
    /// Callers must pass a resolution [`validate_resolution`] accepts; use
    /// [`Mesh::try_uv_sphere`] for untrusted input.
    pub fn uv_sphere(sector_count: u32, stack_count: u32) -> Self {
        let sector_step = 2.0 * PI / sector_count as f32;
        let stack_step = PI / stack_count as f32;

        let vertex_count = sphere_vertex_count(sector_count, stack_count) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for i in 0..=stack_count {
            let stack_angle = PI / 2.0 - i as f32 * stack_step;
            let xy = stack_angle.cos();
            let z = stack_angle.sin();

            for j in 0..=sector_count {
                let sector_angle = j as f32 * sector_step;
                let position = Point3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
                // Unit radius: the outward normal is the position itself
                normals.push(position.coords);
                positions.push(position);
            }
        }

        let mut indices =
            Vec::with_capacity(stack_count.saturating_sub(1) as usize * sector_count as usize * 6);
        for i in 0..stack_count {
            let mut k1 = i * (sector_count + 1);
            let mut k2 = k1 + sector_count + 1;

            for _ in 0..sector_count {
                if i != 0 {
                    indices.extend_from_slice(&[k1, k2, k1 + 1]);
                }
                if i != stack_count - 1 {
                    indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
                }
                k1 += 1;
                k2 += 1;
            }
        }

        tracing::debug!(
            sector_count,
            stack_count,
            vertices = positions.len(),
            triangles = indices.len() / 3,
            "generated uv sphere"
        );

        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as corner index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Positions flattened as `x, y, z` for buffer upload
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Normals flattened as `x, y, z` for buffer upload
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLUTIONS: &[(u32, u32)] = &[(3, 2), (4, 3), (8, 5), (12, 12), (40, 40), (7, 31)];

    #[test]
    fn test_vertex_count() {
        for &(sectors, stacks) in RESOLUTIONS {
            let mesh = Mesh::uv_sphere(sectors, stacks);
            assert_eq!(
                mesh.vertex_count(),
                ((stacks + 1) * (sectors + 1)) as usize
            );
            assert_eq!(mesh.normals.len(), mesh.positions.len());
        }
    }

    #[test]
    fn test_normals_match_positions() {
        let mesh = Mesh::uv_sphere(40, 40);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((p.coords - n).norm() < 1e-6);
            assert!((n.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_indices_in_range_and_not_degenerate() {
        for &(sectors, stacks) in RESOLUTIONS {
            let mesh = Mesh::uv_sphere(sectors, stacks);
            assert_eq!(mesh.indices.len() % 3, 0);
            let count = mesh.vertex_count() as u32;
            for [a, b, c] in mesh.triangles() {
                assert!(a < count && b < count && c < count);
                assert!(a != b && b != c && a != c);
            }
        }
    }

    #[test]
    fn test_triangle_count() {
        // Two triangles per quad, minus one per quad on each pole row
        for &(sectors, stacks) in RESOLUTIONS {
            let mesh = Mesh::uv_sphere(sectors, stacks);
            assert_eq!(
                mesh.triangle_count(),
                (2 * sectors * (stacks - 1)) as usize
            );
        }
    }

    #[test]
    fn test_poles() {
        let mesh = Mesh::uv_sphere(16, 8);
        let first = mesh.positions[0];
        let last = mesh.positions[mesh.vertex_count() - 1];
        assert!((first.z - 1.0).abs() < 1e-6);
        assert!((last.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangles_wind_outward() {
        let mesh = Mesh::uv_sphere(24, 12);
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            let normal = (pb - pa).cross(&(pc - pa));
            let centroid = (pa.coords + pb.coords + pc.coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_rejects_degenerate_resolution() {
        assert_eq!(
            Mesh::try_uv_sphere(2, 10).unwrap_err(),
            GeometryError::InvalidResolution {
                sectors: 2,
                stacks: 10
            }
        );
        assert!(Mesh::try_uv_sphere(10, 1).is_err());
        assert!(Mesh::try_uv_sphere(3, 2).is_ok());
    }

    #[test]
    fn test_rejects_resolution_past_u32_indices() {
        // 70001 * 70001 vertices do not fit in u32
        assert_eq!(
            validate_resolution(70_000, 70_000),
            Err(GeometryError::ResolutionTooLarge {
                sectors: 70_000,
                stacks: 70_000
            })
        );
        assert!(validate_resolution(u32::MAX, u32::MAX).is_err());
        // 65536 * 65535 vertices is just under the limit
        assert!(validate_resolution(65_535, 65_534).is_ok());
        assert!(validate_resolution(65_535, 65_535).is_err());
    }

    #[test]
    fn test_flattened_buffers() {
        let mesh = Mesh::uv_sphere(4, 2);
        assert_eq!(mesh.position_buffer().len(), mesh.vertex_count() * 3);
        assert_eq!(mesh.normal_buffer(), mesh.position_buffer());
    }
}
