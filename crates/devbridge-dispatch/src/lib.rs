//! Bridge controller for devbridge.
//!
//! Owns the device, sizes the framer from the configured transfer limits and
//! runs the event loop: device data becomes `DATA` notifications, control
//! messages are decoded into commands, executed and answered with correlated
//! `RESPONSE` frames. Fatal conditions surface as [`BridgeError`] so the
//! caller can emit one final `ERROR` notification before exiting.

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod notification;
pub mod session;

pub use bridge::{report_failure, Bridge, Shutdown};
pub use command::{Command, Request, CMD_IOCTL, CMD_POSITION, CMD_WRITE};
pub use config::{BridgeConfig, MAX_TRANSFER_SIZE, MESSAGE_OVERHEAD};
pub use error::{BridgeError, Result};
pub use notification::{
    encode_error, encode_response, WriteStatus, NOTIF_DATA, NOTIF_ERROR, NOTIF_RESPONSE,
    STATUS_FAILED,
};
pub use session::run_stdio;
