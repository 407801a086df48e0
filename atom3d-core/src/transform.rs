/// 3D transformation matrices and body placement recipes
use nalgebra::{Matrix4, Unit, Vector3};

/// A world axis used for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// A fixed rotation, angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub axis: Axis,
    pub degrees: f32,
}

impl Tilt {
    pub const fn new(axis: Axis, degrees: f32) -> Self {
        Self { axis, degrees }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::rotation_matrix(self.axis, self.degrees.to_radians())
    }
}

/// One rigid operation of a placement recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Rotate by a fixed angle
    Tilt(Tilt),
    /// Rotate by the elapsed time, in radians, about an axis
    Spin(Axis),
    Translate(Vector3<f32>),
    Scale(f32),
}

impl Step {
    pub fn matrix(&self, time: f32) -> Matrix4<f32> {
        match *self {
            Step::Tilt(tilt) => tilt.matrix(),
            Step::Spin(axis) => Transform::rotation_matrix(axis, time),
            Step::Translate(offset) => Transform::translation_matrix(offset.x, offset.y, offset.z),
            Step::Scale(factor) => Transform::uniform_scale_matrix(factor),
        }
    }
}

/// An ordered list of steps composed onto the identity.
///
/// Each step post-multiplies the accumulated matrix, so the last step is
/// the first one applied to a local-space vertex: scale, then offset, then
/// spin, then tilt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipe {
    steps: Vec<Step>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tilt(mut self, tilt: Tilt) -> Self {
        self.steps.push(Step::Tilt(tilt));
        self
    }

    pub fn spin(mut self, axis: Axis) -> Self {
        self.steps.push(Step::Spin(axis));
        self
    }

    pub fn translate(mut self, offset: Vector3<f32>) -> Self {
        self.steps.push(Step::Translate(offset));
        self
    }

    pub fn scale(mut self, factor: f32) -> Self {
        self.steps.push(Step::Scale(factor));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Compose the model matrix at `time` seconds
    pub fn compose(&self, time: f32) -> Matrix4<f32> {
        self.steps
            .iter()
            .fold(Matrix4::identity(), |model, step| model * step.matrix(time))
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation of `angle` radians about a world axis
    pub fn rotation_matrix(axis: Axis, angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&axis.unit(), angle)
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn uniform_scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Inverse-transpose of the upper 3x3, for transforming normals.
    ///
    /// Falls back to the plain upper 3x3 for singular models.
    pub fn normal_matrix(model: &Matrix4<f32>) -> nalgebra::Matrix3<f32> {
        let linear = model.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear)
    }
}
