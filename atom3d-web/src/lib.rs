/// atom3d Web - WASM bindings for drawing the atom with WebGL
///
/// The page owns the GL context and the render loop. `AtomView` hands it
/// the static buffers once, then per frame the uniform values for every
/// draw, recorded by name the same way the terminal renderer binds them.
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use atom3d_core::{
    projection::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH},
    scene::CLEAR_COLOR,
    ButtonAction, DrawCommand, InputEvent, Mesh, OrbitCamera, PointerButton, Projection, Scene,
    SPHERE_RESOLUTION,
};

pub mod logging;
mod uniforms;

pub use uniforms::UniformRecorder;

#[wasm_bindgen]
pub struct AtomView {
    scene: Scene,
    mesh: Mesh,
    camera: OrbitCamera,
    projection: Projection,
    canvas_width: u32,
    canvas_height: u32,
    frame_uniforms: UniformRecorder,
    commands: Vec<(DrawCommand, UniformRecorder)>,
}

#[wasm_bindgen]
impl AtomView {
    /// Attach to the canvas with id `canvas_id`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<AtomView, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{canvas_id}' is not a canvas")))?;

        tracing::info!(canvas_id, width = canvas.width(), height = canvas.height(), "attached");
        Ok(Self::with_canvas_size(canvas.width(), canvas.height()))
    }

    /// Build a view for a canvas of the given pixel size
    #[wasm_bindgen(js_name = withCanvasSize)]
    pub fn with_canvas_size(width: u32, height: u32) -> AtomView {
        Self {
            scene: Scene::default(),
            mesh: Mesh::uv_sphere(SPHERE_RESOLUTION, SPHERE_RESOLUTION),
            camera: OrbitCamera::new(),
            projection: Projection::new(width.max(1), height.max(1)),
            canvas_width: width.max(1),
            canvas_height: height.max(1),
            frame_uniforms: UniformRecorder::default(),
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas_width = width.max(1);
        self.canvas_height = height.max(1);
        self.projection = Projection::new(self.canvas_width, self.canvas_height);
    }

    // Static buffers

    #[wasm_bindgen(js_name = spherePositions)]
    pub fn sphere_positions(&self) -> Vec<f32> {
        self.mesh.position_buffer()
    }

    #[wasm_bindgen(js_name = sphereNormals)]
    pub fn sphere_normals(&self) -> Vec<f32> {
        self.mesh.normal_buffer()
    }

    #[wasm_bindgen(js_name = sphereIndices)]
    pub fn sphere_indices(&self) -> Vec<u32> {
        self.mesh.indices.clone()
    }

    #[wasm_bindgen(js_name = orbitCount)]
    pub fn orbit_count(&self) -> usize {
        self.scene.guides.len()
    }

    /// Points of guide `index`, drawn as a line loop
    #[wasm_bindgen(js_name = orbitPoints)]
    pub fn orbit_points(&self, index: usize) -> Vec<f32> {
        self.scene
            .guides
            .get(index)
            .map(|guide| guide.path.point_buffer())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = clearColor)]
    pub fn clear_color(&self) -> Vec<f32> {
        CLEAR_COLOR.to_vec()
    }

    // Input, in canvas pixels

    /// Wheel `deltaY`; negative values scroll up and zoom in
    #[wasm_bindgen(js_name = onWheel)]
    pub fn on_wheel(&mut self, delta_y: f32) {
        if delta_y != 0.0 {
            self.camera.handle(InputEvent::Scroll(-delta_y.signum()));
        }
    }

    /// `button` is the DOM `MouseEvent.button` code
    #[wasm_bindgen(js_name = onPointerDown)]
    pub fn on_pointer_down(&mut self, button: i16) {
        if let Some(button) = dom_button(button) {
            self.camera.handle(InputEvent::Button {
                button,
                action: ButtonAction::Press,
            });
        }
    }

    #[wasm_bindgen(js_name = onPointerUp)]
    pub fn on_pointer_up(&mut self, button: i16) {
        if let Some(button) = dom_button(button) {
            self.camera.handle(InputEvent::Button {
                button,
                action: ButtonAction::Release,
            });
        }
    }

    #[wasm_bindgen(js_name = onPointerMove)]
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let scale_x = VIEWPORT_WIDTH as f32 / self.canvas_width as f32;
        let scale_y = VIEWPORT_HEIGHT as f32 / self.canvas_height as f32;
        self.camera.handle(InputEvent::PointerMove {
            x: x * scale_x,
            y: y * scale_y,
        });
    }

    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    // Per frame

    /// Build the draw list for `time` seconds and return its length
    pub fn prepare(&mut self, time: f32) -> usize {
        let frame = self.scene.frame(time, &self.camera, &self.projection);

        self.frame_uniforms = UniformRecorder::default();
        frame.uniforms.apply(&mut self.frame_uniforms);

        self.commands = frame
            .commands
            .into_iter()
            .map(|command| {
                let mut recorder = UniformRecorder::default();
                command.apply(&mut recorder);
                (command, recorder)
            })
            .collect();
        self.commands.len()
    }

    /// Whether draw `index` is the sphere mesh (otherwise an orbit loop)
    #[wasm_bindgen(js_name = isMesh)]
    pub fn is_mesh(&self, index: usize) -> bool {
        matches!(self.commands.get(index), Some((DrawCommand::Mesh { .. }, _)))
    }

    /// Guide index of draw `index`, when it is an orbit loop
    #[wasm_bindgen(js_name = guideIndex)]
    pub fn guide_index(&self, index: usize) -> Option<usize> {
        match self.commands.get(index) {
            Some((DrawCommand::LineLoop { guide, .. }, _)) => Some(*guide),
            _ => None,
        }
    }

    /// Comma-separated uniform names set for draw `index`
    #[wasm_bindgen(js_name = uniformNames)]
    pub fn uniform_names(&self, index: usize) -> String {
        self.commands
            .get(index)
            .map(|(_, recorder)| recorder.names().join(","))
            .unwrap_or_default()
    }

    /// Value of uniform `name` for draw `index`, column-major for matrices
    #[wasm_bindgen(js_name = uniformValue)]
    pub fn uniform_value(&self, index: usize, name: &str) -> Vec<f32> {
        self.commands
            .get(index)
            .and_then(|(_, recorder)| recorder.get(name))
            .map(<[f32]>::to_vec)
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = frameUniformNames)]
    pub fn frame_uniform_names(&self) -> String {
        self.frame_uniforms.names().join(",")
    }

    #[wasm_bindgen(js_name = frameUniformValue)]
    pub fn frame_uniform_value(&self, name: &str) -> Vec<f32> {
        self.frame_uniforms
            .get(name)
            .map(<[f32]>::to_vec)
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = eyePosition)]
    pub fn eye_position(&self) -> Vec<f32> {
        let eye = self.camera.eye_position();
        vec![eye.x, eye.y, eye.z]
    }
}

fn dom_button(code: i16) -> Option<PointerButton> {
    match code {
        0 => Some(PointerButton::Left),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Right),
        _ => None,
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init_logging(None);
    tracing::debug!("atom3d-web loaded");
}
