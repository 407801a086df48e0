/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use atom3d_core::{
    scene::CLEAR_COLOR, DrawCommand, Frame, Mesh, OrbitPath, PhongShader, Projection, Scene,
    ScreenPoint,
};
use nalgebra::{Point3, Vector3, Vector4};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lines lose depth ties against the surfaces they sit on
const LINE_DEPTH_BIAS: f32 = 1e-4;

/// A rectangle of terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Largest rectangle of the given aspect ratio that fits under
    /// `reserved_rows` status lines, centred horizontally.
    ///
    /// Terminal cells are about twice as tall as they are wide.
    pub fn fit(columns: u16, rows: u16, aspect: f32, reserved_rows: u16) -> Self {
        let rows_available = rows.saturating_sub(reserved_rows).max(1);
        let mut width = columns.max(1);
        let mut height = ((width as f32 / aspect) / 2.0).round().max(1.0) as u16;
        if height > rows_available {
            height = rows_available;
            width = ((height as f32 * 2.0 * aspect).round() as u16).clamp(1, columns.max(1));
        }
        Self {
            left: (columns.saturating_sub(width)) / 2,
            top: reserved_rows.min(rows.saturating_sub(1)),
            width,
            height,
        }
    }

    /// Map a terminal cell onto the logical `logical_width` x
    /// `logical_height` pixel space, clamped to the viewport edges.
    pub fn to_logical(
        &self,
        column: u16,
        row: u16,
        logical_width: u32,
        logical_height: u32,
    ) -> (f32, f32) {
        let local_x = column
            .saturating_sub(self.left)
            .min(self.width.saturating_sub(1)) as f32
            + 0.5;
        let local_y = row
            .saturating_sub(self.top)
            .min(self.height.saturating_sub(1)) as f32
            + 0.5;
        (
            local_x * logical_width as f32 / self.width as f32,
            local_y * logical_height as f32 / self.height as f32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: [u8; 3],
}

/// ASCII renderer that rasterizes the atom scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cell_buffer: Vec<Option<Cell>>,
    use_color: bool,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, use_color: bool) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cell_buffer: vec![None; size],
            use_color,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height, self.use_color);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cell_buffer.fill(None);
    }

    /// Character at a cell, `' '` where nothing was drawn
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.cell_buffer[y * self.width + x].map_or(' ', |cell| cell.character)
    }

    /// Colour at a cell, if something was drawn there
    pub fn color_at(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        self.cell_buffer[y * self.width + x].map(|cell| cell.color)
    }

    /// Execute a frame's draw list against `shader`
    pub fn render_frame(
        &mut self,
        frame: &Frame,
        scene: &Scene,
        mesh: &Mesh,
        shader: &mut PhongShader,
    ) {
        self.clear();
        frame.uniforms.apply(shader);

        for command in &frame.commands {
            command.apply(shader);
            match command {
                DrawCommand::Mesh { .. } => self.render_mesh(mesh, shader),
                DrawCommand::LineLoop { guide, .. } => {
                    if let Some(guide) = scene.guides.get(*guide) {
                        self.render_line_loop(&guide.path, shader);
                    }
                }
            }
        }
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, shader: &PhongShader) {
        let shaded: Vec<_> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(position, normal)| shader.vertex(position, normal))
            .collect();
        let projected: Vec<_> = shaded
            .iter()
            .map(|vertex| self.to_screen(&vertex.clip))
            .collect();

        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            // Triangles crossing the near plane are dropped whole
            let (Some(pa), Some(pb), Some(pc)) = (projected[a], projected[b], projected[c]) else {
                continue;
            };

            let world = [
                shaded[a].world_position,
                shaded[b].world_position,
                shaded[c].world_position,
            ];
            let normals = [
                shaded[a].world_normal,
                shaded[b].world_normal,
                shaded[c].world_normal,
            ];
            self.rasterize_triangle([pa, pb, pc], |w0, w1, w2| {
                let position = Point3::from(
                    world[0].coords * w0 + world[1].coords * w1 + world[2].coords * w2,
                );
                let normal = normals[0] * w0 + normals[1] * w1 + normals[2] * w2;
                shader.fragment(&position, &normal)
            });
        }
    }

    /// Draw a path as a closed, unlit line in the bound object colour
    pub fn render_line_loop(&mut self, path: &OrbitPath, shader: &PhongShader) {
        let color = to_rgb(&shader.object_color());
        let projected: Vec<_> = path
            .points
            .iter()
            .map(|point| self.to_screen(&shader.vertex(point, &Vector3::zeros()).clip))
            .collect();

        for (i, j) in path.edges() {
            if let (Some(a), Some(b)) = (projected[i], projected[j]) {
                self.rasterize_line(a, b, color);
            }
        }
    }

    fn to_screen(&self, clip: &Vector4<f32>) -> Option<ScreenPoint> {
        Projection::clip_to_screen(clip, self.width, self.height)
    }

    fn rasterize_triangle<F>(&mut self, coords: [ScreenPoint; 3], mut shade: F)
    where
        F: FnMut(f32, f32, f32) -> Vector3<f32>,
    {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f32 - 1.0) as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f32 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let corners = [(v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y)];
                let Some((w0, w1, w2)) = barycentric(corners[0], corners[1], corners[2], (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    let lit = shade(w0, w1, w2);
                    self.cell_buffer[idx] = Some(Cell {
                        character: ramp_char(lit.max()),
                        color: to_rgb(&lit),
                    });
                }
            }
        }
    }

    fn rasterize_line(&mut self, a: ScreenPoint, b: ScreenPoint, color: [u8; 3]) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let character = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (a.x + dx * t).floor();
            let y = (a.y + dy * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }

            let depth = a.depth + (b.depth - a.depth) * t - LINE_DEPTH_BIAS;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.cell_buffer[idx] = Some(Cell { character, color });
            }
        }
    }

    /// Write the buffer into `viewport`, painting empty cells in the clear
    /// colour.
    pub fn draw<W: Write>(&self, writer: &mut W, viewport: &Viewport) -> std::io::Result<()> {
        let background = to_rgb(&Vector3::from(CLEAR_COLOR));
        if self.use_color {
            writer.queue(SetBackgroundColor(rgb_color(background)))?;
        }

        for y in 0..self.height {
            writer.queue(MoveTo(viewport.left, viewport.top + y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                match self.cell_buffer[y * self.width + x] {
                    Some(cell) => {
                        if self.use_color && current != Some(cell.color) {
                            writer.queue(SetForegroundColor(rgb_color(cell.color)))?;
                            current = Some(cell.color);
                        }
                        writer.queue(Print(cell.character))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn ramp_char(intensity: f32) -> char {
    let index = (intensity.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Pick a stroke matching the on-screen slope. Rows are about twice as
/// tall as columns are wide.
fn line_char(dx: f32, dy: f32) -> char {
    let slope = (dy * 2.0).atan2(dx).to_degrees().rem_euclid(180.0);
    match slope {
        s if !(22.5..157.5).contains(&s) => '-',
        s if s < 67.5 => '\\',
        s if s < 112.5 => '|',
        _ => '/',
    }
}

fn to_rgb(color: &Vector3<f32>) -> [u8; 3] {
    [color.x, color.y, color.z].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn rgb_color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
