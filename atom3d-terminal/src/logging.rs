/// Tracing subscriber setup.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the
/// `--log-level` override, otherwise [`DEFAULT_DIRECTIVE`]. While the app
/// owns the alternate screen anything written to stderr lands on top of the
/// picture, so `--log-file` is the way to watch debug output live.
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_DIRECTIVE: &str = "atom3d_core=info,atom3d_terminal=info";

/// Build the filter for a `--log-level` value such as `debug` or
/// `atom3d_core=trace`. A bare level applies to both atom3d crates.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = match level {
        Some(level) if !level.contains('=') => {
            format!("atom3d_core={level},atom3d_terminal={level}")
        }
        Some(level) => level.to_string(),
        None => DEFAULT_DIRECTIVE.to_string(),
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init_logging(level: Option<&str>, log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = env_filter(level);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
