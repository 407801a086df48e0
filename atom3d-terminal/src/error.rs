/// Application error type
use atom3d_core::GeometryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
