//! Outbound notification vocabulary.
//!
//! Every outbound payload starts with a kind byte:
//! - `RESPONSE`: `[0][token len][token][status BE16][error name if status = 0xFFFF]`
//! - `DATA`: `[1][bytes read from the device]`
//! - `ERROR`: `[2][error name]`, sent right before a fatal exit

use bytes::BufMut;
use devbridge_frame::FrameError;

/// Correlated reply to a request.
pub const NOTIF_RESPONSE: u8 = 0;

/// Unsolicited device data.
pub const NOTIF_DATA: u8 = 1;

/// Fatal condition; the bridge is about to exit.
pub const NOTIF_ERROR: u8 = 2;

/// Status word marking a failed write.
pub const STATUS_FAILED: u16 = 0xFFFF;

/// Outcome of a device write as carried in a `RESPONSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Bytes accepted by the device.
    Written(u16),
    /// POSIX name of the failure.
    Failed(&'static str),
}

/// Encode a `RESPONSE` into `dst`, returning the payload length.
pub fn encode_response(
    dst: &mut [u8],
    token: &[u8],
    status: WriteStatus,
) -> Result<usize, FrameError> {
    let token_len = u8::try_from(token.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: token.len(),
        max: u8::MAX as usize,
    })?;
    let reason: &[u8] = match status {
        WriteStatus::Written(_) => &[],
        WriteStatus::Failed(name) => name.as_bytes(),
    };

    let needed = 2 + token.len() + 2 + reason.len();
    check_fits(needed, dst.len())?;

    let mut out = &mut dst[..];
    out.put_u8(NOTIF_RESPONSE);
    out.put_u8(token_len);
    out.put_slice(token);
    match status {
        WriteStatus::Written(count) => out.put_u16(count),
        WriteStatus::Failed(_) => {
            out.put_u16(STATUS_FAILED);
            out.put_slice(reason);
        }
    }
    Ok(needed)
}

/// Encode an `ERROR` notification into `dst`, returning the payload length.
pub fn encode_error(dst: &mut [u8], name: &str) -> Result<usize, FrameError> {
    let needed = 1 + name.len();
    check_fits(needed, dst.len())?;

    let mut out = &mut dst[..];
    out.put_u8(NOTIF_ERROR);
    out.put_slice(name.as_bytes());
    Ok(needed)
}

fn check_fits(needed: usize, available: usize) -> Result<(), FrameError> {
    if needed > available {
        return Err(FrameError::PayloadTooLarge {
            size: needed,
            max: available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_layout() {
        let mut buf = [0u8; 32];
        let len = encode_response(&mut buf, b"tk", WriteStatus::Written(0x0102)).unwrap();
        assert_eq!(&buf[..len], &[NOTIF_RESPONSE, 2, b't', b'k', 0x01, 0x02]);
    }

    #[test]
    fn failure_response_layout() {
        let mut buf = [0u8; 32];
        let len = encode_response(&mut buf, b"x", WriteStatus::Failed("e2big")).unwrap();
        assert_eq!(
            &buf[..len],
            &[NOTIF_RESPONSE, 1, b'x', 0xFF, 0xFF, b'e', b'2', b'b', b'i', b'g']
        );
    }

    #[test]
    fn error_layout() {
        let mut buf = [0u8; 16];
        let len = encode_error(&mut buf, "eio").unwrap();
        assert_eq!(&buf[..len], &[NOTIF_ERROR, b'e', b'i', b'o']);
    }

    #[test]
    fn longest_token_fits_overhead() {
        let token = [0xA5u8; 255];
        let mut buf = vec![0u8; crate::MESSAGE_OVERHEAD];
        let len = encode_response(&mut buf, &token, WriteStatus::Failed("enametoolong")).unwrap();
        assert_eq!(len, 2 + 255 + 2 + "enametoolong".len());
        assert_eq!(buf[1], 255);
    }

    #[test]
    fn rejects_region_too_small() {
        let mut buf = [0u8; 4];
        let err = encode_response(&mut buf, b"tok", WriteStatus::Written(1)).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 7, max: 4 }));

        let err = encode_error(&mut buf, "eacces").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }
}
