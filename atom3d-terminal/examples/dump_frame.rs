/// Render a single frame of the atom to stdout without taking over the
/// terminal.
///
/// Usage: cargo run --example dump_frame -- [time] [columns] [rows]
use std::io::{self, Write};

use atom3d_core::{Mesh, OrbitCamera, PhongShader, Projection, Scene, SPHERE_RESOLUTION};
use atom3d_terminal::{AsciiRenderer, Viewport};

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    let time: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0.0);
    let columns: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(80);
    let rows: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30);

    let projection = Projection::default();
    let viewport = Viewport::fit(columns, rows, projection.aspect, 0);
    let scene = Scene::default();
    let mesh = Mesh::uv_sphere(SPHERE_RESOLUTION, SPHERE_RESOLUTION);
    let mut shader = PhongShader::new();
    let mut renderer = AsciiRenderer::new(viewport.width as usize, viewport.height as usize, false);

    let frame = scene.frame(time, &OrbitCamera::new(), &projection);
    renderer.render_frame(&frame, &scene, &mesh, &mut shader);

    let mut out = io::stdout().lock();
    for y in 0..renderer.height() {
        let line: String = (0..renderer.width()).map(|x| renderer.char_at(x, y)).collect();
        writeln!(out, "{}", line.trim_end())?;
    }
    out.flush()
}
