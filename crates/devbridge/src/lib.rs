//! Expose a device file to a parent process over stdin/stdout.
//!
//! The parent sends length-prefixed commands (currently: write) on the
//! bridge's stdin and receives correlated responses, device data and fatal
//! error notifications on its stdout.
//!
//! # Crate Structure
//!
//! - [`transport`] — Device handles, stdio channels, readiness polling, POSIX names
//! - [`frame`] — Two-byte length-prefixed framing with fixed-capacity reassembly
//! - [`dispatch`] — Command dispatch and the bridge event loop

/// Re-export transport types.
pub mod transport {
    pub use devbridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use devbridge_frame::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use devbridge_dispatch::*;
}
