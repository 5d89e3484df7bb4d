use std::os::fd::AsRawFd;

use devbridge_frame::Framer;
use devbridge_transport::{Device, FdPoller};
use tracing::info;

use crate::bridge::{report_failure, Bridge, Shutdown};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Run a bridge on the process's stdin/stdout.
///
/// The framer comes up first so that every later failure (invalid limits,
/// device open, anything in the event loop) can be reported in-band before
/// this returns the error. A failure to set up the framer itself cannot be
/// reported and is returned as-is.
pub fn run_stdio(config: &BridgeConfig) -> Result<Shutdown> {
    let mut framer = Framer::stdio(config.framer_config())?;

    let device = match config
        .validate()
        .and_then(|mode| Device::open(&config.device, mode).map_err(BridgeError::from))
    {
        Ok(device) => device,
        Err(err) => {
            report_failure(framer.transmitter(), &err);
            return Err(err);
        }
    };

    let mut events = FdPoller::new(
        framer.input_fd(),
        config.watches_device().then(|| device.as_raw_fd()),
    );
    info!(device = ?device.path(), mode = device.mode().as_str(), "bridge ready");

    let mut bridge = Bridge::new(framer, device, config);
    bridge.run(&mut events).inspect_err(|err| bridge.report_failure(err))
}
