use std::path::PathBuf;

use crate::posix::io_error_name;

/// Errors that can occur at the OS edge.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the backing device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Neither a read nor a write capacity was configured.
    #[error("invalid access mode: both read and write capacities are zero")]
    InvalidAccessMode,

    /// The readiness wait failed.
    #[error("poll failed: {0}")]
    Poll(std::io::Error),

    /// An I/O error occurred on a descriptor.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Lowercase POSIX name used when this error is reported in-band.
    pub fn posix_name(&self) -> &'static str {
        match self {
            TransportError::Open { source, .. } => io_error_name(source),
            TransportError::InvalidAccessMode => "einval",
            TransportError::Poll(source) | TransportError::Io(source) => io_error_name(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
