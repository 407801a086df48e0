/// Scene transform composer.
///
/// The atom is a fixed set of bodies (one nucleus, five electrons) and five
/// orbit guides. Every frame the composer turns elapsed time into one model
/// matrix per body and packages the draw list with the frame uniforms.
use nalgebra::{Matrix4, Point3, Vector3};
use std::time::{Duration, Instant};

use crate::camera::OrbitCamera;
use crate::orbit::{OrbitPath, OrientationPreset, ORBIT_RADIUS, ORBIT_SEGMENTS};
use crate::projection::Projection;
use crate::shading::ShaderProgram;
use crate::transform::Recipe;

pub const NUCLEUS_SCALE: f32 = 0.5;
pub const ELECTRON_SCALE: f32 = 0.2;

pub const NUCLEUS_COLOR: [f32; 3] = [0.0, 0.0, 1.0];
pub const ELECTRON_COLOR: [f32; 3] = [1.0, 0.6, 0.0];
pub const ORBIT_COLOR: [f32; 3] = [1.0, 0.6, 0.0];
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const CLEAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// A sphere drawn in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: &'static str,
    pub recipe: Recipe,
    pub color: Vector3<f32>,
}

impl Body {
    pub fn nucleus() -> Self {
        Self {
            name: "nucleus",
            recipe: Recipe::new().scale(NUCLEUS_SCALE),
            color: Vector3::from(NUCLEUS_COLOR),
        }
    }

    pub fn electron(name: &'static str, preset: &OrientationPreset) -> Self {
        Self {
            name,
            recipe: preset.body_recipe(ORBIT_RADIUS, ELECTRON_SCALE),
            color: Vector3::from(ELECTRON_COLOR),
        }
    }

    pub fn model_matrix(&self, time: f32) -> Matrix4<f32> {
        self.recipe.compose(time)
    }

    /// World-space centre at `time`
    pub fn center(&self, time: f32) -> Point3<f32> {
        self.model_matrix(time).transform_point(&Point3::origin())
    }
}

/// A decorative line loop marking an orbit plane
#[derive(Debug, Clone)]
pub struct OrbitGuide {
    pub preset: OrientationPreset,
    pub path: OrbitPath,
    pub model: Matrix4<f32>,
    pub color: Vector3<f32>,
}

impl OrbitGuide {
    pub fn new(preset: OrientationPreset, segments: u32) -> Self {
        Self {
            path: preset.path(ORBIT_RADIUS, segments),
            model: preset.tilt_matrix(),
            color: Vector3::from(ORBIT_COLOR),
            preset,
        }
    }
}

/// One draw call for the frame renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw the shared sphere mesh
    Mesh {
        body: usize,
        model: Matrix4<f32>,
        color: Vector3<f32>,
    },
    /// Draw an orbit guide as a closed line
    LineLoop {
        guide: usize,
        model: Matrix4<f32>,
        color: Vector3<f32>,
    },
}

/// Uniforms shared by every draw in a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub view_pos: Point3<f32>,
    /// The light rides with the camera
    pub light_pos: Point3<f32>,
    pub light_color: Vector3<f32>,
}

impl FrameUniforms {
    pub fn apply<S: ShaderProgram>(&self, shader: &mut S) {
        shader.set_vec3("lightPos", self.light_pos.coords);
        shader.set_vec3("viewPos", self.view_pos.coords);
        shader.set_vec3("lightColor", self.light_color);
        shader.set_mat4("view", &self.view);
        shader.set_mat4("projection", &self.projection);
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub time: f32,
    pub uniforms: FrameUniforms,
    pub commands: Vec<DrawCommand>,
}

impl DrawCommand {
    /// Bind this command's per-draw uniforms.
    ///
    /// Line loops set `color`, which the Phong program does not declare, so
    /// they keep whatever `objectColor` the previous draw left bound.
    pub fn apply<S: ShaderProgram>(&self, shader: &mut S) {
        match self {
            DrawCommand::Mesh { model, color, .. } => {
                shader.set_mat4("model", model);
                shader.set_vec3("objectColor", *color);
            }
            DrawCommand::LineLoop { model, color, .. } => {
                shader.set_mat4("model", model);
                shader.set_vec3("color", *color);
            }
        }
    }
}

/// The fixed atom scene
#[derive(Debug, Clone)]
pub struct Scene {
    pub bodies: Vec<Body>,
    pub guides: Vec<OrbitGuide>,
}

impl Scene {
    /// Nucleus, five electrons and five guides
    pub fn atom(orbit_segments: u32) -> Self {
        let bodies = vec![
            Body::nucleus(),
            Body::electron("electron-1", &OrientationPreset::EQUATORIAL),
            Body::electron("electron-2", &OrientationPreset::POLAR),
            Body::electron("electron-3", &OrientationPreset::TILTED),
            Body::electron("electron-4", &OrientationPreset::DIAGONAL),
            Body::electron("electron-5", &OrientationPreset::DIAGONAL_MIRROR),
        ];
        let guides = OrientationPreset::ALL
            .iter()
            .map(|&preset| OrbitGuide::new(preset, orbit_segments))
            .collect();

        Self { bodies, guides }
    }

    /// One model matrix per body, in body order
    pub fn model_matrices(&self, time: f32) -> Vec<Matrix4<f32>> {
        self.bodies.iter().map(|body| body.model_matrix(time)).collect()
    }

    pub fn frame(&self, time: f32, camera: &OrbitCamera, projection: &Projection) -> Frame {
        let eye = camera.eye_position();
        let uniforms = FrameUniforms {
            view: camera.view_matrix(),
            projection: projection.matrix(),
            view_pos: eye,
            light_pos: eye,
            light_color: Vector3::from(LIGHT_COLOR),
        };

        let bodies = self
            .bodies
            .iter()
            .zip(self.model_matrices(time))
            .enumerate()
            .map(|(index, (body, model))| DrawCommand::Mesh {
                body: index,
                model,
                color: body.color,
            });
        let guides = self
            .guides
            .iter()
            .enumerate()
            .map(|(index, guide)| DrawCommand::LineLoop {
                guide: index,
                model: guide.model,
                color: guide.color,
            });

        Frame {
            time,
            uniforms,
            commands: bodies.chain(guides).collect(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::atom(ORBIT_SEGMENTS)
    }
}

/// Elapsed-time source for the animation, pausable
#[derive(Debug, Clone)]
pub struct Clock {
    started: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn toggle_pause(&mut self) {
        self.toggle_pause_at(Instant::now());
    }

    fn toggle_pause_at(&mut self, now: Instant) {
        match self.paused_at.take() {
            Some(paused_at) => self.paused_total += now.saturating_duration_since(paused_at),
            None => self.paused_at = Some(now),
        }
    }

    /// Seconds of animation time
    pub fn elapsed(&self) -> f32 {
        self.elapsed_at(Instant::now())
    }

    fn elapsed_at(&self, now: Instant) -> f32 {
        let now = self.paused_at.unwrap_or(now);
        now.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
            .as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::PhongShader;
    use crate::transform::{Axis, Step, Tilt};
    use std::f32::consts::PI;

    const TIMES: &[f32] = &[0.0, 0.4, 1.0, PI / 2.0, 2.5, PI, 5.0, 13.7];

    #[test]
    fn test_scene_layout() {
        let scene = Scene::default();
        assert_eq!(scene.bodies.len(), 6);
        assert_eq!(scene.guides.len(), 5);
        assert!(scene
            .guides
            .iter()
            .all(|g| g.path.points.len() == ORBIT_SEGMENTS as usize + 1));
    }

    #[test]
    fn test_nucleus_is_pure_scale() {
        let scene = Scene::default();
        let expected = Matrix4::new_scaling(NUCLEUS_SCALE);
        for &t in TIMES {
            assert!((scene.bodies[0].model_matrix(t) - expected).norm() < 1e-6);
        }
    }

    #[test]
    fn test_electron_one_positions() {
        let scene = Scene::default();
        let electron = &scene.bodies[1];

        let model = electron.model_matrix(0.0);
        let expected = Matrix4::new_translation(&Vector3::new(2.0, 0.0, 0.0))
            * Matrix4::new_scaling(ELECTRON_SCALE);
        assert!((model - expected).norm() < 1e-6);

        let half_turn = electron.center(PI);
        assert!((half_turn - Point3::new(-2.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_electrons_stay_on_orbit_radius() {
        let scene = Scene::default();
        for body in &scene.bodies[1..] {
            for &t in TIMES {
                let distance = body.center(t).coords.norm();
                assert!((distance - ORBIT_RADIUS).abs() < 1e-4, "{} at {}", body.name, t);
            }
        }
    }

    #[test]
    fn test_electrons_follow_their_guides() {
        let scene = Scene::default();
        for (body, guide) in scene.bodies[1..].iter().zip(&scene.guides) {
            let normal = guide.preset.plane_normal();
            for &t in TIMES {
                let offset = body.center(t).coords.dot(&normal);
                assert!(
                    offset.abs() < 1e-4,
                    "{} leaves the {} plane",
                    body.name,
                    guide.preset.name
                );
            }
        }
    }

    #[test]
    fn test_electron_size_independent_of_orbit() {
        let scene = Scene::default();
        for body in &scene.bodies[1..] {
            let model = body.model_matrix(1.3);
            let center = model.transform_point(&Point3::origin());
            let surface = model.transform_point(&Point3::new(0.0, 0.0, 1.0));
            assert!(((surface - center).norm() - ELECTRON_SCALE).abs() < 1e-5);
        }
    }

    #[test]
    fn test_body_recipes() {
        let scene = Scene::default();
        assert_eq!(scene.bodies[0].recipe.steps(), &[Step::Scale(NUCLEUS_SCALE)]);
        assert_eq!(
            scene.bodies[3].recipe.steps(),
            &[
                Step::Tilt(Tilt::new(Axis::X, 45.0)),
                Step::Tilt(Tilt::new(Axis::Y, 45.0)),
                Step::Spin(Axis::Y),
                Step::Translate(Vector3::new(ORBIT_RADIUS, 0.0, 0.0)),
                Step::Scale(ELECTRON_SCALE),
            ]
        );
    }

    #[test]
    fn test_mesh_commands_use_model_matrices() {
        let scene = Scene::default();
        let t = 2.5;
        let models = scene.model_matrices(t);
        assert_eq!(models.len(), scene.bodies.len());
        for (body, model) in scene.bodies.iter().zip(&models) {
            assert_eq!(&body.model_matrix(t), model);
        }

        let frame = scene.frame(t, &OrbitCamera::new(), &Projection::default());
        for (index, model) in models.iter().enumerate() {
            match &frame.commands[index] {
                DrawCommand::Mesh { body, model: m, .. } => {
                    assert_eq!(*body, index);
                    assert_eq!(m, model);
                }
                other => panic!("expected a mesh draw, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_frame_uniforms_and_order() {
        let scene = Scene::default();
        let camera = OrbitCamera::new();
        let frame = scene.frame(1.0, &camera, &Projection::default());

        assert_eq!(frame.commands.len(), 11);
        assert!(matches!(frame.commands[0], DrawCommand::Mesh { body: 0, .. }));
        assert!(matches!(frame.commands[5], DrawCommand::Mesh { body: 5, .. }));
        assert!(matches!(frame.commands[6], DrawCommand::LineLoop { guide: 0, .. }));
        assert_eq!(frame.uniforms.light_pos, camera.eye_position());
        assert_eq!(frame.uniforms.view_pos, camera.eye_position());
        assert_eq!(frame.uniforms.light_color, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_line_loop_keeps_previous_object_color() {
        let scene = Scene::default();
        let frame = scene.frame(0.0, &OrbitCamera::new(), &Projection::default());
        let mut shader = PhongShader::new();
        frame.uniforms.apply(&mut shader);

        frame.commands[0].apply(&mut shader);
        assert_eq!(shader.object_color(), Vector3::from(NUCLEUS_COLOR));
        frame.commands[5].apply(&mut shader);
        frame.commands[6].apply(&mut shader);
        assert_eq!(shader.object_color(), Vector3::from(ELECTRON_COLOR));
        assert_eq!(*shader.model(), scene.guides[0].model);
    }

    #[test]
    fn test_clock_pause() {
        let start = Instant::now();
        let mut clock = Clock {
            started: start,
            paused_at: None,
            paused_total: Duration::ZERO,
        };
        assert!((clock.elapsed_at(start + Duration::from_secs(2)) - 2.0).abs() < 1e-6);

        clock.toggle_pause_at(start + Duration::from_secs(2));
        assert!(clock.is_paused());
        assert!((clock.elapsed_at(start + Duration::from_secs(10)) - 2.0).abs() < 1e-6);

        clock.toggle_pause_at(start + Duration::from_secs(5));
        assert!(!clock.is_paused());
        assert!((clock.elapsed_at(start + Duration::from_secs(6)) - 3.0).abs() < 1e-6);
    }
}
