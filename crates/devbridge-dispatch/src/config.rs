use std::path::PathBuf;

use devbridge_frame::{FramerConfig, MAX_PAYLOAD};
use devbridge_transport::AccessMode;

use crate::error::{BridgeError, Result};

/// Room reserved in each framer buffer beyond the device transfer size.
///
/// Covers the kind/command byte, the token (at most 255 bytes plus its length
/// byte) and a status word followed by an error name.
pub const MESSAGE_OVERHEAD: usize = 512;

/// Largest per-transfer capacity: every frame must stay within the 16-bit
/// length field, and write counts must never collide with the failure status.
pub const MAX_TRANSFER_SIZE: usize = MAX_PAYLOAD - MESSAGE_OVERHEAD;

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Device to open.
    pub device: PathBuf,
    /// Most bytes read from the device per `DATA` notification (0 = never read).
    pub max_rx: usize,
    /// Most bytes written to the device per request (0 = never write).
    pub max_tx: usize,
}

impl BridgeConfig {
    pub fn new(device: impl Into<PathBuf>, max_rx: usize, max_tx: usize) -> Self {
        Self {
            device: device.into(),
            max_rx,
            max_tx,
        }
    }

    /// Check the limits and derive how the device must be opened.
    pub fn validate(&self) -> Result<AccessMode> {
        for (name, value) in [("max_rx", self.max_rx), ("max_tx", self.max_tx)] {
            if value > MAX_TRANSFER_SIZE {
                return Err(BridgeError::InvalidConfig(format!(
                    "{name} {value} exceeds {MAX_TRANSFER_SIZE}"
                )));
            }
        }

        Ok(AccessMode::from_capacities(self.max_rx, self.max_tx)?)
    }

    /// Whether the device is polled for inbound data.
    pub fn watches_device(&self) -> bool {
        self.max_rx > 0
    }

    /// Framer sizing for these limits.
    ///
    /// Inbound control messages carry data to write to the device, outbound
    /// ones carry data read from it, hence the crossover. Limits are clamped
    /// so a framer can always be built, even if only to report that the
    /// configuration is invalid.
    pub fn framer_config(&self) -> FramerConfig {
        FramerConfig {
            max_rx_message_size: self.max_tx.min(MAX_TRANSFER_SIZE) + MESSAGE_OVERHEAD,
            max_tx_message_size: self.max_rx.min(MAX_TRANSFER_SIZE) + MESSAGE_OVERHEAD,
        }
    }
}
