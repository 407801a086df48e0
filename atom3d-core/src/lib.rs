/// atom3d Core Library - Atom scene geometry, camera and animation
///
/// This library provides the stateless math behind the atom view: the
/// shared UV-sphere mesh, orbit guides, the orbit camera controller and the
/// per-frame body transforms, plus the Phong shader contract the renderers
/// implement.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod input;
pub mod orbit;
pub mod projection;
pub mod scene;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use error::GeometryError;
pub use geometry::Mesh;
pub use input::{ButtonAction, InputEvent, PointerButton};
pub use orbit::{OrbitPath, OrientationPreset, PathVariant};
pub use projection::{Projection, ScreenPoint};
pub use scene::{Clock, DrawCommand, Frame, FrameUniforms, Scene};
pub use shading::{PhongShader, ShaderProgram};
pub use transform::{Axis, Recipe, Step, Tilt, Transform};

/// Default sphere resolution (sectors and stacks)
pub const SPHERE_RESOLUTION: u32 = 40;
