use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: a single big-endian u16 payload length.
pub const HEADER_SIZE: usize = 2;

/// Largest payload the length field can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Payload length announced by the header at the start of `src`.
///
/// Returns `None` until both header bytes are available.
pub fn read_header(src: &[u8]) -> Option<usize> {
    match src {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo]) as usize),
        _ => None,
    }
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Length       │ Payload          │
/// │ (2B BE)      │ (Length bytes)   │
/// └──────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u16::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD,
    })?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u16(len);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some(payload_len) = read_header(&src[..]) else {
        return Ok(None);
    };

    if payload_len > max_payload {
        return Err(FrameError::MessageTooLong {
            size: HEADER_SIZE + payload_len,
            max: HEADER_SIZE + max_payload,
        });
    }

    if src.len() < HEADER_SIZE + payload_len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(payload_len).freeze()))
}
