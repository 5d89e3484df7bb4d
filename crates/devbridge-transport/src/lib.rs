//! OS edge of devbridge.
//!
//! Everything that touches a raw file descriptor lives here:
//! - the device handle and its access-mode derivation
//! - unbuffered control-channel handles over stdin/stdout
//! - readiness sources (`poll(2)` in production, scripted in tests)
//! - the POSIX error-name vocabulary used for in-band error reports
//!
//! This is the lowest layer. The framer and the dispatcher build on top of it.

#[cfg(not(unix))]
compile_error!("devbridge-transport only supports unix targets");

pub mod channel;
pub mod device;
pub mod error;
pub mod poll;
pub mod posix;

pub use channel::ControlStream;
pub use device::{AccessMode, Device};
pub use error::{Result, TransportError};
pub use poll::{EventSource, FdPoller, Readiness};
pub use posix::{errno_name, io_error_name, FALLBACK_NAME};
