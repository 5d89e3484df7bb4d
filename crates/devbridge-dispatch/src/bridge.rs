use std::io::{ErrorKind, Read, Write};

use devbridge_frame::{Framer, Pump, Transmitter};
use devbridge_transport::{io_error_name, EventSource};
use tracing::{debug, error, info, trace, warn};

use crate::command::{Command, Request};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::notification::{encode_error, encode_response, WriteStatus, NOTIF_DATA};

/// Why the event loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The controlling process closed the control channel.
    RemoteClosed,
}

/// The bridge controller: one framed control channel and one device.
///
/// `R`/`W` are the control channel halves, `D` the device. All state is owned
/// here and only touched from the thread running [`Bridge::run`].
pub struct Bridge<R, W, D> {
    framer: Framer<R, W>,
    device: D,
    max_rx: usize,
    max_tx: usize,
}

impl<R: Read, W: Write, D: Read + Write> Bridge<R, W, D> {
    /// Attach a framer (sized by [`BridgeConfig::framer_config`]) to an open device.
    pub fn new(framer: Framer<R, W>, device: D, config: &BridgeConfig) -> Self {
        Self {
            framer,
            device,
            max_rx: config.max_rx,
            max_tx: config.max_tx,
        }
    }

    /// Run until the remote closes the channel or a fatal error occurs.
    ///
    /// Within one wake-up the device is serviced before the control channel,
    /// and everything that woke is fully handled before waiting again.
    pub fn run<S: EventSource>(&mut self, events: &mut S) -> Result<Shutdown> {
        info!(
            max_rx = self.max_rx,
            max_tx = self.max_tx,
            "bridge event loop started"
        );

        loop {
            let readiness = events.wait()?;

            if readiness.device && self.max_rx > 0 {
                self.handle_device_ready()?;
            }

            if readiness.control && self.handle_control_ready()? == Pump::Closed {
                info!("control channel closed; shutting down");
                return Ok(Shutdown::RemoteClosed);
            }
        }
    }

    /// Read once from the device and forward the bytes as a `DATA` notification.
    ///
    /// A zero-length read is forwarded as an empty notification; the remote
    /// decides what device EOF means.
    pub fn handle_device_ready(&mut self) -> Result<usize> {
        let region = self.framer.transmit_region();
        region[0] = NOTIF_DATA;
        let window = self.max_rx.min(region.len() - 1);

        let read = loop {
            match self.device.read(&mut region[1..1 + window]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(BridgeError::DeviceRead(err)),
            }
        };

        trace!(read, "forwarding device data");
        self.framer.send(1 + read)?;
        Ok(read)
    }

    /// Pump the control channel, dispatching every complete request.
    pub fn handle_control_ready(&mut self) -> Result<Pump> {
        let device = &mut self.device;
        let max_tx = self.max_tx;
        self.framer
            .pump_input(|message, tx| dispatch(device, max_tx, message, tx))
    }

    /// Best-effort `ERROR` notification for a fatal condition.
    pub fn report_failure(&mut self, err: &BridgeError) {
        report_failure(self.framer.transmitter(), err);
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn framer(&self) -> &Framer<R, W> {
        &self.framer
    }

    /// Consume the bridge and return the framer and device.
    pub fn into_parts(self) -> (Framer<R, W>, D) {
        (self.framer, self.device)
    }
}

/// Send the final `ERROR` notification for `err`.
///
/// Failures are logged and swallowed: the process is exiting either way.
pub fn report_failure<W: Write>(tx: &mut Transmitter<W>, err: &BridgeError) {
    let reason = err.posix_name();
    error!(error = %err, reason, "fatal bridge error");

    let sent = encode_error(tx.region(), reason).and_then(|len| tx.send(len));
    if let Err(send_err) = sent {
        warn!(error = %send_err, "failed to report fatal error");
    }
}

fn dispatch<D: Write, W: Write>(
    device: &mut D,
    max_tx: usize,
    message: &[u8],
    tx: &mut Transmitter<W>,
) -> Result<()> {
    let request = Request::decode(message)?;

    match request {
        Request::Write { token, payload } => {
            let status = write_device(device, max_tx, payload);
            debug!(
                token_len = token.len(),
                size = payload.len(),
                ?status,
                "write"
            );
            let len = encode_response(tx.region(), token, status)?;
            tx.send(len)?;
        }
        Request::Ioctl(body) | Request::Position(body) => {
            debug!(
                command = request.command().map_or("reserved", Command::name),
                size = body.len(),
                "command not implemented; no reply"
            );
        }
        Request::Unknown { tag } => {
            debug!(tag, "ignoring unknown command");
        }
    }

    Ok(())
}

fn write_device<D: Write>(device: &mut D, max_tx: usize, payload: &[u8]) -> WriteStatus {
    if payload.len() > max_tx {
        return WriteStatus::Failed("e2big");
    }

    loop {
        match device.write(payload) {
            // n <= max_tx <= MAX_TRANSFER_SIZE, so it fits and never equals STATUS_FAILED
            Ok(n) => return WriteStatus::Written(n as u16),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return WriteStatus::Failed(io_error_name(&err)),
        }
    }
}
