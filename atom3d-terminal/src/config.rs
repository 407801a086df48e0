/// Command-line arguments and validated settings
use clap::Parser;
use std::path::PathBuf;

use atom3d_core::{
    geometry::validate_resolution,
    orbit::{validate_orbit, ORBIT_RADIUS, ORBIT_SEGMENTS},
    SPHERE_RESOLUTION,
};

use crate::error::AppError;

/// atom3d: an animated atom in your terminal. Drag with the left mouse
/// button to orbit, scroll to zoom.
#[derive(Parser, Debug, Clone)]
#[command(name = "atom3d-terminal", version, about)]
pub struct Args {
    /// Sphere resolution along longitude.
    #[arg(long, default_value_t = SPHERE_RESOLUTION)]
    pub sectors: u32,

    /// Sphere resolution along latitude.
    #[arg(long, default_value_t = SPHERE_RESOLUTION)]
    pub stacks: u32,

    /// Segments per orbit guide.
    #[arg(long, default_value_t = ORBIT_SEGMENTS)]
    pub segments: u32,

    /// Target frames per second.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Render with shading characters only.
    #[arg(long)]
    pub no_color: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Validated application settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub sectors: u32,
    pub stacks: u32,
    pub segments: u32,
    pub fps: u32,
    pub use_color: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Result<Self, AppError> {
        // Reject degenerate geometry before touching the terminal
        validate_resolution(args.sectors, args.stacks)?;
        validate_orbit(ORBIT_RADIUS, args.segments)?;

        Ok(Self {
            sectors: args.sectors,
            stacks: args.stacks,
            segments: args.segments,
            fps: args.fps,
            use_color: !args.no_color,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sectors: SPHERE_RESOLUTION,
            stacks: SPHERE_RESOLUTION,
            segments: ORBIT_SEGMENTS,
            fps: 30,
            use_color: true,
        }
    }
}
