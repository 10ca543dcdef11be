use thiserror::Error;

use crate::typewriter::SurfaceError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing target: no display surface to write to")]
    MissingTarget,

    #[error("Invalid delay: typewriter speed must be greater than zero")]
    InvalidDelay,

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
