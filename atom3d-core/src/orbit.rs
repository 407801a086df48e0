/// Orbit guide polylines and the orbit-plane presets shared by guides and
/// electrons.
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::PI;

use crate::error::GeometryError;
use crate::transform::{Axis, Recipe, Tilt};

/// Radius of every electron orbit
pub const ORBIT_RADIUS: f32 = 2.0;
/// Default number of segments in an orbit guide
pub const ORBIT_SEGMENTS: u32 = 100;

/// Check an orbit radius and segment count
pub fn validate_orbit(radius: f32, segments: u32) -> Result<(), GeometryError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::InvalidRadius(radius));
    }
    if segments < 3 {
        return Err(GeometryError::InvalidSegments(segments));
    }
    Ok(())
}

/// Which axes carry the circle's `cos`/`sin` components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathVariant {
    /// `(r cos, 0, r sin)`
    PlaneXz,
    /// `(0, r cos, r sin)`
    PlaneYz,
    /// Sampled like `PlaneXz`; tilted by the consumer's model matrix
    Diagonal,
}

impl PathVariant {
    fn point(self, radius: f32, angle: f32) -> Point3<f32> {
        let (sin, cos) = angle.sin_cos();
        match self {
            PathVariant::PlaneXz | PathVariant::Diagonal => {
                Point3::new(radius * cos, 0.0, radius * sin)
            }
            PathVariant::PlaneYz => Point3::new(0.0, radius * cos, radius * sin),
        }
    }
}

/// A closed polyline sampling a circle centred on the origin.
///
/// Holds `segments + 1` points; the last one sits `2π` from the first and
/// consumers draw the path as a line loop.
#[derive(Debug, Clone)]
pub struct OrbitPath {
    pub variant: PathVariant,
    pub radius: f32,
    pub points: Vec<Point3<f32>>,
}

impl OrbitPath {
    pub fn try_new(
        variant: PathVariant,
        radius: f32,
        segments: u32,
    ) -> Result<Self, GeometryError> {
        validate_orbit(radius, segments)?;
        Ok(Self::new(variant, radius, segments))
    }

    pub fn new(variant: PathVariant, radius: f32, segments: u32) -> Self {
        let points: Vec<_> = (0..=segments)
            .map(|i| {
                let angle = 2.0 * PI * i as f32 / segments as f32;
                variant.point(radius, angle)
            })
            .collect();

        tracing::debug!(?variant, radius, points = points.len(), "generated orbit path");

        Self {
            variant,
            radius,
            points,
        }
    }

    pub fn with_defaults(variant: PathVariant) -> Self {
        Self::new(variant, ORBIT_RADIUS, ORBIT_SEGMENTS)
    }

    pub fn segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Line-loop edges as point index pairs
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (i, (i + 1) % n))
    }

    /// Points flattened as `x, y, z` for buffer upload
    pub fn point_buffer(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

/// Orientation of one orbit plane.
///
/// The tilts orient the plane, the spin axis is the plane's normal before
/// tilting, and `radial` is the unit direction the body is pushed out along
/// before spinning. Guides and electrons both read their rotation from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationPreset {
    pub name: &'static str,
    pub tilts: &'static [Tilt],
    pub spin_axis: Axis,
    pub radial: [f32; 3],
    pub path: PathVariant,
}

impl OrientationPreset {
    pub const EQUATORIAL: Self = Self {
        name: "equatorial",
        tilts: &[],
        spin_axis: Axis::Y,
        radial: [1.0, 0.0, 0.0],
        path: PathVariant::PlaneXz,
    };

    pub const POLAR: Self = Self {
        name: "polar",
        tilts: &[],
        spin_axis: Axis::X,
        radial: [0.0, 0.0, 1.0],
        path: PathVariant::PlaneYz,
    };

    pub const TILTED: Self = Self {
        name: "tilted",
        tilts: &[Tilt::new(Axis::X, 45.0), Tilt::new(Axis::Y, 45.0)],
        spin_axis: Axis::Y,
        radial: [1.0, 0.0, 0.0],
        path: PathVariant::PlaneXz,
    };

    pub const DIAGONAL: Self = Self {
        name: "diagonal",
        tilts: &[Tilt::new(Axis::X, 45.0), Tilt::new(Axis::Z, 45.0)],
        spin_axis: Axis::Y,
        radial: [1.0, 0.0, 0.0],
        path: PathVariant::Diagonal,
    };

    pub const DIAGONAL_MIRROR: Self = Self {
        name: "diagonal-mirror",
        tilts: &[Tilt::new(Axis::X, -45.0), Tilt::new(Axis::Z, -45.0)],
        spin_axis: Axis::Y,
        radial: [1.0, 0.0, 0.0],
        path: PathVariant::Diagonal,
    };

    pub const ALL: [Self; 5] = [
        Self::EQUATORIAL,
        Self::POLAR,
        Self::TILTED,
        Self::DIAGONAL,
        Self::DIAGONAL_MIRROR,
    ];

    /// Fixed tilt of the plane, used as the guide's model matrix
    pub fn tilt_matrix(&self) -> Matrix4<f32> {
        self.tilts
            .iter()
            .fold(Matrix4::identity(), |m, tilt| m * tilt.matrix())
    }

    /// Tilt steps followed by the spin, without offset or scale
    pub fn recipe(&self) -> Recipe {
        let recipe = self
            .tilts
            .iter()
            .fold(Recipe::new(), |recipe, &tilt| recipe.tilt(tilt));
        recipe.spin(self.spin_axis)
    }

    /// Recipe for a body of `scale` travelling on this plane at `radius`
    pub fn body_recipe(&self, radius: f32, scale: f32) -> Recipe {
        self.recipe()
            .translate(Vector3::from(self.radial) * radius)
            .scale(scale)
    }

    /// Untilted guide path for this plane
    pub fn path(&self, radius: f32, segments: u32) -> OrbitPath {
        OrbitPath::new(self.path, radius, segments)
    }

    /// World-space normal of the orbit plane
    pub fn plane_normal(&self) -> Vector3<f32> {
        let local = match self.path {
            PathVariant::PlaneXz | PathVariant::Diagonal => Vector3::y(),
            PathVariant::PlaneYz => Vector3::x(),
        };
        self.tilt_matrix().transform_vector(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_count_and_radius() {
        for variant in [PathVariant::PlaneXz, PathVariant::PlaneYz, PathVariant::Diagonal] {
            for &(radius, segments) in &[(2.0f32, 100u32), (0.5, 3), (7.25, 17)] {
                let path = OrbitPath::new(variant, radius, segments);
                assert_eq!(path.points.len(), segments as usize + 1);
                assert_eq!(path.segments(), segments as usize);
                for p in &path.points {
                    assert!((p.coords.norm() - radius).abs() < 1e-4 * radius.max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_plane_components() {
        let xz = OrbitPath::with_defaults(PathVariant::PlaneXz);
        assert!(xz.points.iter().all(|p| p.y == 0.0));
        let yz = OrbitPath::with_defaults(PathVariant::PlaneYz);
        assert!(yz.points.iter().all(|p| p.x == 0.0));
        let diag = OrbitPath::with_defaults(PathVariant::Diagonal);
        for (a, b) in diag.points.iter().zip(&xz.points) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_points_equidistant() {
        let path = OrbitPath::new(PathVariant::PlaneYz, 2.0, 64);
        let chord = (path.points[1] - path.points[0]).norm();
        for w in path.points.windows(2) {
            assert!(((w[1] - w[0]).norm() - chord).abs() < 1e-4);
        }
        // First and last are 2π apart in parameter space
        assert!((path.points[0] - path.points[64]).norm() < 1e-4);
    }

    #[test]
    fn test_edges_close_the_loop() {
        let path = OrbitPath::new(PathVariant::PlaneXz, 1.0, 4);
        let edges: Vec<_> = path.edges().collect();
        assert_eq!(edges.len(), 5);
        assert_eq!(edges[4], (4, 0));
    }

    #[test]
    fn test_try_new_validation() {
        assert_eq!(
            OrbitPath::try_new(PathVariant::PlaneXz, 0.0, 100).unwrap_err(),
            GeometryError::InvalidRadius(0.0)
        );
        assert!(OrbitPath::try_new(PathVariant::PlaneXz, f32::NAN, 100).is_err());
        assert_eq!(
            OrbitPath::try_new(PathVariant::PlaneYz, 2.0, 2).unwrap_err(),
            GeometryError::InvalidSegments(2)
        );
        assert!(OrbitPath::try_new(PathVariant::Diagonal, 2.0, 3).is_ok());
    }

    #[test]
    fn test_mirror_pair_tilts_are_opposite() {
        let a = OrientationPreset::DIAGONAL.tilts;
        let b = OrientationPreset::DIAGONAL_MIRROR.tilts;
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.axis, y.axis);
            assert_eq!(x.degrees, -y.degrees);
        }
    }

    #[test]
    fn test_guide_points_lie_on_tilted_plane() {
        for preset in OrientationPreset::ALL {
            let normal = preset.plane_normal();
            let model = preset.tilt_matrix();
            for p in preset.path(ORBIT_RADIUS, 32).points {
                let world = model.transform_point(&p);
                assert!(world.coords.dot(&normal).abs() < 1e-4, "{}", preset.name);
            }
        }
    }
}
