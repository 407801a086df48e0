/// Orbital camera controller.
///
/// Tracks zoom distance and yaw/pitch around a fixed target, driven by
/// scroll and pointer-drag events. Angles are stored in degrees.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::input::{ButtonAction, InputEvent, PointerButton};
use crate::projection::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 20.0;
pub const MIN_PITCH: f32 = -89.0;
pub const MAX_PITCH: f32 = 89.0;
/// Degrees of rotation per unit of pointer travel
pub const MOUSE_SENSITIVITY: f32 = 0.1;
/// Distance change per unit of scroll
pub const SCROLL_SPEED: f32 = 0.5;

pub const DEFAULT_DISTANCE: f32 = 6.0;
pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;

/// Camera orbiting a fixed target
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    target: Point3<f32>,
    distance: f32,
    yaw: f32,
    pitch: f32,
    last_x: f32,
    last_y: f32,
    dragging: bool,
    first_sample: bool,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            target: Point3::origin(),
            distance: DEFAULT_DISTANCE,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            last_x: VIEWPORT_WIDTH as f32 / 2.0,
            last_y: VIEWPORT_HEIGHT as f32 / 2.0,
            dragging: false,
            first_sample: true,
        }
    }

    /// Restore the startup state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Scroll(delta) => self.scroll(delta),
            InputEvent::Button { button, action } => self.button(button, action),
            InputEvent::PointerMove { x, y } => self.pointer_moved(x, y),
        }
    }

    /// Zoom in for positive deltas, out for negative ones
    pub fn scroll(&mut self, delta: f32) {
        self.distance = (self.distance - delta * SCROLL_SPEED).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Only the left button drags
    pub fn button(&mut self, button: PointerButton, action: ButtonAction) {
        if button != PointerButton::Left {
            return;
        }
        match action {
            ButtonAction::Press => self.dragging = true,
            ButtonAction::Release => {
                self.dragging = false;
                self.first_sample = true;
            }
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !self.dragging {
            self.first_sample = true;
            return;
        }

        if self.first_sample {
            self.last_x = x;
            self.last_y = y;
            self.first_sample = false;
            return;
        }

        // Screen y grows downwards, pitch grows upwards
        let dx = (x - self.last_x) * MOUSE_SENSITIVITY;
        let dy = (self.last_y - y) * MOUSE_SENSITIVITY;
        self.last_x = x;
        self.last_y = y;

        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// World-space eye position on the orbit sphere
    pub fn eye_position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let direction = Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw);
        self.target + direction * self.distance
    }

    /// Unit direction from the eye towards the target
    pub fn look_direction(&self) -> Vector3<f32> {
        (self.target - self.eye_position()).normalize()
    }

    /// Right-handed look-at with +Y up
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye_position(), &self.target, &Vector3::y())
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
