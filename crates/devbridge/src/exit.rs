use devbridge_dispatch::{BridgeError, Shutdown};

// Exit code constants. Usage errors exit with clap's own code (2).
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

/// Exit code for the outcome of a bridge session.
///
/// The in-band `ERROR` notification has already been sent by the time a
/// failure reaches here; this only decides the process status.
pub fn code_for(outcome: &Result<Shutdown, BridgeError>) -> i32 {
    match outcome {
        Ok(Shutdown::RemoteClosed) => {
            tracing::info!("remote closed the control channel");
            SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, reason = err.posix_name(), "exiting after fatal error");
            FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_close_is_success() {
        assert_eq!(code_for(&Ok(Shutdown::RemoteClosed)), SUCCESS);
    }

    #[test]
    fn any_error_is_failure() {
        let err = BridgeError::InvalidConfig("max_rx too large".to_string());
        assert_eq!(code_for(&Err(err)), FAILURE);

        let err = BridgeError::MalformedRequest { len: 1 };
        assert_eq!(code_for(&Err(err)), FAILURE);
    }
}
