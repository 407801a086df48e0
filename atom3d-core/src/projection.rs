/// Perspective projection and screen mapping
use nalgebra::{Matrix4, Point3, Vector4};

/// Logical viewport the camera and input coordinates are defined against
pub const VIEWPORT_WIDTH: u32 = 800;
pub const VIEWPORT_HEIGHT: u32 = 600;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// A point mapped to the screen. `depth` is NDC z in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y: 45f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    /// Map a world-space point through `view_projection` onto a
    /// `width` x `height` grid.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: usize,
        height: usize,
    ) -> Option<ScreenPoint> {
        Self::clip_to_screen(&(view_projection * point.to_homogeneous()), width, height)
    }

    /// Perspective-divide a clip-space position onto a `width` x `height`
    /// grid, y growing downwards.
    ///
    /// Returns `None` for points behind the eye or outside the depth range.
    /// Points off the sides of the screen are still returned so callers can
    /// clip primitives themselves.
    pub fn clip_to_screen(clip: &Vector4<f32>, width: usize, height: usize) -> Option<ScreenPoint> {
        // Prevent division by near-zero or negative w
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;
        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc_y) * 0.5 * height as f32,
            depth,
        })
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}
