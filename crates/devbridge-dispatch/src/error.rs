use devbridge_frame::FrameError;
use devbridge_transport::{io_error_name, TransportError};

/// Fatal bridge conditions.
///
/// Per-request failures (oversized writes, device write errors) never become
/// a `BridgeError`; they are answered in-band and the loop keeps running.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Device open or readiness wait failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The control channel failed or delivered an unframeable message.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Startup limits are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A message too short for its own token.
    #[error("malformed request ({len} bytes)")]
    MalformedRequest { len: usize },

    /// Reading from the device failed.
    #[error("device read failed: {0}")]
    DeviceRead(std::io::Error),
}

impl BridgeError {
    /// Lowercase POSIX name carried by the final `ERROR` notification.
    pub fn posix_name(&self) -> &'static str {
        match self {
            BridgeError::Transport(err) => err.posix_name(),
            BridgeError::Frame(err) => err.posix_name(),
            BridgeError::InvalidConfig(_) => "einval",
            BridgeError::MalformedRequest { .. } => "ebadmsg",
            BridgeError::DeviceRead(err) => io_error_name(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
