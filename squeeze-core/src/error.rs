use thiserror::Error;

/// Custom error types for squeeze
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Toolchain provisioning error: {0}")]
    Provision(#[from] crate::toolchain::ProvisionError),

    #[error("Probe error: {0}")]
    Probe(#[from] crate::probe::ProbeError),

    #[error("Transcode error: {0}")]
    Transcode(#[from] crate::transcode::TranscodeError),
}

/// Result type for squeeze operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
