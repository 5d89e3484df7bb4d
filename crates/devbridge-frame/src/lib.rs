//! Length-prefixed message framing for the devbridge control channel.
//!
//! Every message in both directions is framed as:
//! - a 2-byte big-endian payload length (the header never counts itself)
//! - the payload
//!
//! The [`Framer`] owns two fixed-capacity buffers allocated once at startup.
//! It reassembles complete messages from arbitrarily chunked input and
//! rejects any message that would not fit instead of growing.

pub mod codec;
pub mod error;
pub mod framer;

pub use codec::{decode_frame, encode_frame, read_header, HEADER_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use framer::{Framer, FramerConfig, Pump, Transmitter};
