use devbridge_transport::{io_error_name, TransportError};

/// Errors that can occur during frame encoding/decoding.
///
/// Every variant is fatal to the control channel: once a stream has lost
/// frame alignment there is no way to resynchronise it.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An inbound message does not fit the receive buffer.
    #[error("message too long ({size} bytes, max {max})")]
    MessageTooLong { size: usize, max: usize },

    /// An outbound payload does not fit the transmit buffer or the length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The configured receive capacity cannot hold even a header.
    #[error("receive capacity too small ({size} bytes, min {min})")]
    CapacityTooSmall { size: usize, min: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer stopped accepting bytes in the middle of a frame.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// Setting up the underlying channel failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// Lowercase POSIX name used when this error is reported in-band.
    pub fn posix_name(&self) -> &'static str {
        match self {
            FrameError::MessageTooLong { .. } | FrameError::PayloadTooLarge { .. } => "emsgsize",
            FrameError::CapacityTooSmall { .. } => "einval",
            FrameError::Io(err) => io_error_name(err),
            FrameError::ConnectionClosed => "epipe",
            FrameError::Transport(err) => err.posix_name(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
