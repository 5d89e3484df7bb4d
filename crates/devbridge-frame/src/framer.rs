use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};

use devbridge_transport::ControlStream;
use tracing::{debug, trace};

use crate::codec::{read_header, HEADER_SIZE, MAX_PAYLOAD};
use crate::error::{FrameError, Result};

/// Buffer sizing for a [`Framer`].
///
/// Sizes are whole-message sizes: the receive side rejects any message whose
/// header plus payload exceeds `max_rx_message_size`, the transmit side offers
/// `max_tx_message_size` bytes of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    pub max_rx_message_size: usize,
    pub max_tx_message_size: usize,
}

impl FramerConfig {
    /// Bytes allocated for the receive buffer.
    pub fn rx_capacity(&self) -> usize {
        self.max_rx_message_size + HEADER_SIZE
    }

    /// Bytes allocated for the transmit buffer.
    pub fn tx_capacity(&self) -> usize {
        self.max_tx_message_size + HEADER_SIZE
    }

    fn validate(&self) -> Result<()> {
        if self.max_rx_message_size < HEADER_SIZE {
            return Err(FrameError::CapacityTooSmall {
                size: self.max_rx_message_size,
                min: HEADER_SIZE,
            });
        }
        if self.max_tx_message_size > MAX_PAYLOAD {
            return Err(FrameError::PayloadTooLarge {
                size: self.max_tx_message_size,
                max: MAX_PAYLOAD,
            });
        }
        Ok(())
    }
}

/// Result of one [`Framer::pump_input`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    /// Input was consumed; the handler ran this many times (possibly zero).
    Dispatched(usize),
    /// The remote end closed the channel.
    Closed,
}

/// Outbound half of a [`Framer`]: the reusable transmit buffer and its sink.
///
/// Callers fill [`Transmitter::region`] and then [`Transmitter::send`] the
/// number of payload bytes they wrote.
pub struct Transmitter<W> {
    inner: W,
    buf: Box<[u8]>,
}

impl<W: Write> Transmitter<W> {
    /// The payload area of the transmit buffer.
    pub fn region(&mut self) -> &mut [u8] {
        &mut self.buf[HEADER_SIZE..]
    }

    /// Payload capacity of the transmit buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len() - HEADER_SIZE
    }

    /// Frame and write the first `payload_len` bytes of the region (blocking).
    ///
    /// Either the whole frame goes out or an error is returned; a partial
    /// frame leaves the peer's decoder unrecoverable, so callers must treat
    /// any error here as fatal.
    pub fn send(&mut self, payload_len: usize) -> Result<()> {
        if payload_len > self.capacity() {
            return Err(FrameError::PayloadTooLarge {
                size: payload_len,
                max: self.capacity(),
            });
        }

        // capacity() <= MAX_PAYLOAD, checked by FramerConfig::validate
        let header = (payload_len as u16).to_be_bytes();
        self.buf[..HEADER_SIZE].copy_from_slice(&header);

        let total = HEADER_SIZE + payload_len;
        let mut offset = 0usize;
        while offset < total {
            match self.inner.write(&self.buf[offset..total]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        trace!(payload_len, "sent frame");

        self.flush()
    }

    /// Copy `payload` into the region and send it.
    pub fn send_payload(&mut self, payload: &[u8]) -> Result<()> {
        let region = self.region();
        if payload.len() > region.len() {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: region.len(),
            });
        }
        region[..payload.len()].copy_from_slice(payload);
        self.send(payload.len())
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

/// Fixed-capacity framer for one control channel.
///
/// Owns the receive buffer (with its fill cursor) and the transmit buffer.
/// Neither buffer is ever resized after construction.
pub struct Framer<R, W> {
    reader: R,
    rx: Box<[u8]>,
    index: usize,
    tx: Transmitter<W>,
    config: FramerConfig,
}

impl<R: Read, W: Write> Framer<R, W> {
    /// Allocate both buffers and wrap the given channel halves.
    pub fn new(reader: R, writer: W, config: FramerConfig) -> Result<Self> {
        config.validate()?;

        debug!(
            rx_capacity = config.rx_capacity(),
            tx_capacity = config.tx_capacity(),
            "framer configured"
        );

        Ok(Self {
            reader,
            rx: vec![0u8; config.rx_capacity()].into_boxed_slice(),
            index: 0,
            tx: Transmitter {
                inner: writer,
                buf: vec![0u8; config.tx_capacity()].into_boxed_slice(),
            },
            config,
        })
    }

    /// The payload area of the transmit buffer.
    pub fn transmit_region(&mut self) -> &mut [u8] {
        self.tx.region()
    }

    /// Frame and write `payload_len` bytes of the transmit region.
    pub fn send(&mut self, payload_len: usize) -> Result<()> {
        self.tx.send(payload_len)
    }

    /// Direct access to the outbound half.
    pub fn transmitter(&mut self) -> &mut Transmitter<W> {
        &mut self.tx
    }

    /// Read once from the channel and dispatch every complete message.
    ///
    /// A single read may complete zero, one or many messages; `handler` is
    /// called once per message, in order, with the payload (header stripped)
    /// and the transmitter so it can reply. Leftover bytes of an incomplete
    /// message stay buffered for the next call.
    ///
    /// A message that cannot fit the receive buffer is a fatal
    /// [`FrameError::MessageTooLong`]; it is detected from the header alone,
    /// before the handler ever sees it.
    pub fn pump_input<F, E>(&mut self, mut handler: F) -> std::result::Result<Pump, E>
    where
        F: FnMut(&[u8], &mut Transmitter<W>) -> std::result::Result<(), E>,
        E: From<FrameError>,
    {
        let max_message = self.config.max_rx_message_size;

        let read = loop {
            match self.reader.read(&mut self.rx[self.index..max_message]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err).into()),
            }
        };

        if read == 0 {
            debug!(buffered = self.index, "control channel closed");
            return Ok(Pump::Closed);
        }
        self.index += read;

        let mut dispatched = 0usize;
        while let Some(payload_len) = read_header(&self.rx[..self.index]) {
            let message_len = HEADER_SIZE + payload_len;
            if message_len > max_message {
                return Err(FrameError::MessageTooLong {
                    size: message_len,
                    max: max_message,
                }
                .into());
            }

            if message_len > self.index {
                break;
            }

            trace!(payload_len, "dispatching message");
            handler(&self.rx[HEADER_SIZE..message_len], &mut self.tx)?;
            dispatched += 1;

            self.rx.copy_within(message_len..self.index, 0);
            self.index -= message_len;
        }

        Ok(Pump::Dispatched(dispatched))
    }

    /// Bytes received but not yet part of a dispatched message.
    pub fn buffered(&self) -> usize {
        self.index
    }

    /// Borrow the outbound sink.
    pub fn writer_ref(&self) -> &W {
        self.tx.get_ref()
    }

    /// Consume the framer and return both channel halves.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.tx.inner)
    }
}

impl Framer<ControlStream, ControlStream> {
    /// Framer over the process's standard input and output.
    pub fn stdio(config: FramerConfig) -> Result<Self> {
        Self::new(ControlStream::stdin()?, ControlStream::stdout()?, config)
    }
}

impl<R: AsRawFd, W> Framer<R, W> {
    /// Descriptor to watch for inbound readiness.
    pub fn input_fd(&self) -> RawFd {
        self.reader.as_raw_fd()
    }
}
