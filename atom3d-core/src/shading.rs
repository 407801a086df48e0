/// Phong shader contract.
///
/// One program serves both bodies and orbit lines. Uniforms are set by name
/// through [`ShaderProgram`]; names the program does not declare are
/// accepted and have no effect, like an unbound uniform location.
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::transform::Transform;

pub const AMBIENT_STRENGTH: f32 = 0.1;
pub const SPECULAR_STRENGTH: f32 = 0.5;
pub const SHININESS: i32 = 32;

/// Uniform-setting interface of a shader program
pub trait ShaderProgram {
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
}

/// Vertex stage output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub clip: nalgebra::Vector4<f32>,
    pub world_position: Point3<f32>,
    pub world_normal: Vector3<f32>,
}

/// CPU rendition of the ambient + diffuse + specular program
#[derive(Debug, Clone, PartialEq)]
pub struct PhongShader {
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    object_color: Vector3<f32>,
    light_color: Vector3<f32>,
    light_pos: Vector3<f32>,
    view_pos: Vector3<f32>,
}

impl PhongShader {
    pub fn new() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            object_color: Vector3::new(1.0, 1.0, 1.0),
            light_color: Vector3::new(1.0, 1.0, 1.0),
            light_pos: Vector3::zeros(),
            view_pos: Vector3::zeros(),
        }
    }

    pub fn object_color(&self) -> Vector3<f32> {
        self.object_color
    }

    pub fn model(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn vertex(&self, position: &Point3<f32>, normal: &Vector3<f32>) -> ShadedVertex {
        let world_position = self.model.transform_point(position);
        ShadedVertex {
            clip: Transform::mvp_matrix(&self.model, &self.view, &self.projection)
                * position.to_homogeneous(),
            world_position,
            world_normal: self.normal_matrix * normal,
        }
    }

    /// Lit colour for an interpolated fragment, components in `[0, 1]`
    pub fn fragment(&self, world_position: &Point3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
        let ambient = self.light_color * AMBIENT_STRENGTH;

        let norm = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        let light_dir = (self.light_pos - world_position.coords)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let diffuse = self.light_color * norm.dot(&light_dir).max(0.0);

        let view_dir = (self.view_pos - world_position.coords)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let reflect_dir = reflect(&-light_dir, &norm);
        let spec = view_dir.dot(&reflect_dir).max(0.0).powi(SHININESS);
        let specular = self.light_color * (SPECULAR_STRENGTH * spec);

        (ambient + diffuse + specular)
            .component_mul(&self.object_color)
            .map(|c| c.clamp(0.0, 1.0))
    }
}

impl Default for PhongShader {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderProgram for PhongShader {
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        match name {
            "model" => {
                self.model = *value;
                self.normal_matrix = Transform::normal_matrix(value);
            }
            "view" => self.view = *value,
            "projection" => self.projection = *value,
            _ => tracing::trace!(name, "ignoring undeclared mat4 uniform"),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        match name {
            "objectColor" => self.object_color = value,
            "lightColor" => self.light_color = value,
            "lightPos" => self.light_pos = value,
            "viewPos" => self.view_pos = value,
            _ => tracing::trace!(name, "ignoring undeclared vec3 uniform"),
        }
    }
}

/// Reflect `incident` about `normal`, as GLSL `reflect`
fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}
