/// Terminal front end for the atom view
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use atom3d_core::{
    projection::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH},
    Clock, Mesh, OrbitCamera, PhongShader, Projection, Scene,
};

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod renderer;

pub use config::AppConfig;
pub use error::AppError;
pub use input::Action;
pub use renderer::{AsciiRenderer, Viewport};

/// Rows kept free above the picture for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for the terminal atom view
pub struct TerminalApp {
    config: AppConfig,
    scene: Scene,
    mesh: Mesh,
    camera: OrbitCamera,
    projection: Projection,
    shader: PhongShader,
    renderer: AsciiRenderer,
    clock: Clock,
    viewport: Viewport,
    columns: u16,
    rows: u16,
    running: bool,
    debug: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(config, columns, rows))
    }

    /// Build the app for a terminal of `columns` x `rows` cells
    pub fn with_size(config: &AppConfig, columns: u16, rows: u16) -> Self {
        let projection = Projection::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        let viewport = Viewport::fit(columns, rows, projection.aspect, STATUS_ROWS);
        let mesh = Mesh::uv_sphere(config.sectors, config.stacks);
        let scene = Scene::atom(config.segments);

        info!(
            columns,
            rows,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            bodies = scene.bodies.len(),
            guides = scene.guides.len(),
            "atom scene ready"
        );

        Self {
            config: config.clone(),
            scene,
            mesh,
            camera: OrbitCamera::new(),
            projection,
            shader: PhongShader::new(),
            renderer: AsciiRenderer::new(
                viewport.width as usize,
                viewport.height as usize,
                config.use_color,
            ),
            clock: Clock::start(),
            viewport,
            columns,
            rows,
            running: true,
            debug: false,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        let setup = execute!(
            out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        );

        let result = match setup {
            Ok(()) => self.main_loop(),
            Err(e) => Err(e.into()),
        };

        // Restore the terminal even when the loop failed
        let restore = execute!(
            out,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        terminal::disable_raw_mode()?;
        restore?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.config.fps.max(1) as f64);
        let mut out = stdout();

        while self.running {
            let frame_start = Instant::now();

            // Drain everything queued since the last frame
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                if let Some(action) = input::map_event(&event, &self.viewport) {
                    self.apply(action);
                }
            }
            if !self.running {
                break;
            }

            self.render(self.clock.elapsed());
            self.present(&mut out)?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            let window = now - self.last_fps_sample;
            if window.as_secs() >= 1 {
                self.fps = self.frame_count as f32 / window.as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
                debug!(fps = self.fps, "frame rate");
            }
        }

        info!("shutting down");
        Ok(())
    }

    /// Apply one input action to the app state
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ResetCamera => {
                self.camera.reset();
                debug!("camera reset");
            }
            Action::TogglePause => {
                self.clock.toggle_pause();
                debug!(paused = self.clock.is_paused(), "animation toggled");
            }
            Action::ToggleDebug => self.debug = !self.debug,
            Action::Resize { columns, rows } => self.resize(columns, rows),
            Action::Camera(event) => self.camera.handle(event),
        }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        self.viewport = Viewport::fit(columns, rows, self.projection.aspect, STATUS_ROWS);
        self.renderer
            .resize(self.viewport.width as usize, self.viewport.height as usize);
        debug!(columns, rows, viewport = ?self.viewport, "terminal resized");
    }

    /// Rasterize the scene at `time` into the cell buffer
    pub fn render(&mut self, time: f32) {
        let frame = self.scene.frame(time, &self.camera, &self.projection);
        self.renderer
            .render_frame(&frame, &self.scene, &self.mesh, &mut self.shader);
    }

    /// Write the cell buffer and status line to `writer`
    pub fn present<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.renderer.draw(writer, &self.viewport)?;

        queue!(
            writer,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        writer.flush()
    }

    fn status_line(&self) -> String {
        let mut line = format!(
            "atom3d | FPS: {:.1}{} | drag=orbit scroll/+-=zoom R=reset P=pause D=debug Q=quit",
            self.fps,
            if self.clock.is_paused() { " [paused]" } else { "" },
        );
        if self.debug {
            let eye = self.camera.eye_position();
            line.push_str(&format!(
                " | yaw {:.1} pitch {:.1} dist {:.1} eye ({:.2}, {:.2}, {:.2})",
                self.camera.yaw(),
                self.camera.pitch(),
                self.camera.distance(),
                eye.x,
                eye.y,
                eye.z
            ));
        }
        line.chars().take(self.columns as usize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atom3d_core::{camera::DEFAULT_DISTANCE, InputEvent};

    fn app() -> TerminalApp {
        let config = AppConfig {
            sectors: 16,
            stacks: 12,
            segments: 48,
            ..AppConfig::default()
        };
        TerminalApp::with_size(&config, 120, 41)
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut app = app();
        assert!(app.is_running());
        app.apply(Action::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_zoom_and_reset() {
        let mut app = app();
        app.apply(Action::Camera(InputEvent::Scroll(1.0)));
        assert!(app.camera().distance() < DEFAULT_DISTANCE);
        app.apply(Action::ResetCamera);
        assert_eq!(app.camera(), &OrbitCamera::new());
    }

    #[test]
    fn test_pause_toggle() {
        let mut app = app();
        app.apply(Action::TogglePause);
        assert!(app.is_paused());
        app.apply(Action::TogglePause);
        assert!(!app.is_paused());
    }

    #[test]
    fn test_resize_refits_viewport() {
        let mut app = app();
        app.apply(Action::Resize { columns: 80, rows: 100 });
        let viewport = app.viewport();
        assert_eq!((viewport.width, viewport.height), (80, 30));
        assert_eq!(app.renderer().width(), 80);
        assert_eq!(app.renderer().height(), 30);
    }

    #[test]
    fn test_present_writes_status_line() {
        let mut app = app();
        app.apply(Action::ToggleDebug);
        app.render(0.0);
        let mut out = Vec::new();
        app.present(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("atom3d | FPS"));
        assert!(text.contains("dist 6.0"));
    }

    #[test]
    fn test_status_line_fits_terminal() {
        let mut app = app();
        app.resize(20, 10);
        assert_eq!(app.status_line().chars().count(), 20);
    }
}
