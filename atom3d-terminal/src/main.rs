/// atom3d terminal viewer
///
/// Renders the animated atom as shaded ASCII art.
/// Controls:
///   - Left mouse drag: Orbit the camera
///   - Scroll / +/-: Zoom
///   - R: Reset camera, P: Pause, D: Debug overlay
///   - Q/ESC: Quit
use std::process::ExitCode;

use atom3d_terminal::{config, logging, AppConfig, AppError, TerminalApp};

fn main() -> ExitCode {
    let args = config::parse();

    if let Err(e) = logging::init_logging(args.log_level.as_deref(), args.log_file.as_deref()) {
        eprintln!("atom3d-terminal: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "atom3d-terminal failed");
            eprintln!("atom3d-terminal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &config::Args) -> Result<(), AppError> {
    let config = AppConfig::from_args(args)?;
    tracing::info!(?config, "starting");

    let mut app = TerminalApp::new(&config)?;
    app.run()
}
