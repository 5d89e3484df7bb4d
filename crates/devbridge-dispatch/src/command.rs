//! Inbound command vocabulary and request decoding.
//!
//! Request payload layout:
//! ```text
//! ┌─────────┬───────────┬─────────────────┬──────────────────┐
//! │ Command │ Token len │ Token           │ Command payload  │
//! │ (1B)    │ (1B)      │ (Token len B)   │ (rest)           │
//! └─────────┴───────────┴─────────────────┴──────────────────┘
//! ```

use bytes::Buf;

use crate::error::{BridgeError, Result};

/// Write the payload to the device.
pub const CMD_WRITE: u8 = 1;

/// Reserved: device ioctl.
pub const CMD_IOCTL: u8 = 2;

/// Reserved: seek/position.
pub const CMD_POSITION: u8 = 3;

/// Known commands.
///
/// `Ioctl` and `Position` are part of the vocabulary but have no wire payload
/// or reply shape yet; the dispatcher matches them explicitly and does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Write,
    Ioctl,
    Position,
}

impl Command {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            CMD_WRITE => Some(Command::Write),
            CMD_IOCTL => Some(Command::Ioctl),
            CMD_POSITION => Some(Command::Position),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Command::Write => CMD_WRITE,
            Command::Ioctl => CMD_IOCTL,
            Command::Position => CMD_POSITION,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Write => "write",
            Command::Ioctl => "ioctl",
            Command::Position => "position",
        }
    }
}

/// A decoded inbound message.
///
/// Only `Write` has a defined body. The reserved and unknown variants keep
/// whatever followed the tag without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    Write {
        /// Correlation token, echoed verbatim in the response.
        token: &'a [u8],
        /// Bytes to write to the device.
        payload: &'a [u8],
    },
    Ioctl(&'a [u8]),
    Position(&'a [u8]),
    Unknown { tag: u8 },
}

impl<'a> Request<'a> {
    /// Split a message on its command tag.
    ///
    /// An empty message is malformed. So is a write shorter than its declared
    /// token, since there is no token to echo back.
    pub fn decode(message: &'a [u8]) -> Result<Self> {
        let malformed = || BridgeError::MalformedRequest { len: message.len() };

        let mut src = message;
        if !src.has_remaining() {
            return Err(malformed());
        }
        let tag = src.get_u8();

        let request = match Command::from_tag(tag) {
            Some(Command::Write) => {
                if !src.has_remaining() {
                    return Err(malformed());
                }
                let token_len = src.get_u8() as usize;
                if src.remaining() < token_len {
                    return Err(malformed());
                }
                let (token, payload) = src.split_at(token_len);
                Request::Write { token, payload }
            }
            Some(Command::Ioctl) => Request::Ioctl(src),
            Some(Command::Position) => Request::Position(src),
            None => Request::Unknown { tag },
        };
        Ok(request)
    }

    pub fn command(&self) -> Option<Command> {
        match self {
            Request::Write { .. } => Some(Command::Write),
            Request::Ioctl(_) => Some(Command::Ioctl),
            Request::Position(_) => Some(Command::Position),
            Request::Unknown { .. } => None,
        }
    }
}
