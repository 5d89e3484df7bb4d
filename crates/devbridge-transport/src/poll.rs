//! Readiness sources for the bridge event loop.
//!
//! The loop only ever asks one question: "which of my two inputs can make
//! progress?" [`EventSource`] is that question as a trait, so the loop can be
//! driven by real descriptors ([`FdPoller`]) or by a scripted source in tests.

use std::io::ErrorKind;
use std::os::fd::RawFd;

use tracing::trace;

use crate::error::{Result, TransportError};

/// Outcome of one readiness wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    /// The control channel is readable or was hung up.
    pub control: bool,
    /// The device is readable or was hung up.
    pub device: bool,
}

impl Readiness {
    pub fn control() -> Self {
        Self {
            control: true,
            device: false,
        }
    }

    pub fn device() -> Self {
        Self {
            control: false,
            device: true,
        }
    }

    pub fn both() -> Self {
        Self {
            control: true,
            device: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.control && !self.device
    }
}

/// A source of readiness events.
pub trait EventSource {
    /// Block until at least one input is ready.
    fn wait(&mut self) -> Result<Readiness>;
}

// Hang-up and error conditions count as readiness: the following read
// surfaces them (EOF or an errno) instead of the loop spinning on them.
const READY_MASK: libc::c_short = libc::POLLIN | libc::POLLHUP | libc::POLLERR | libc::POLLNVAL;

/// `poll(2)` over the control channel and, optionally, the device.
#[derive(Debug, Clone, Copy)]
pub struct FdPoller {
    control: RawFd,
    device: Option<RawFd>,
}

impl FdPoller {
    /// Watch `control`, plus `device` when the device is read from.
    pub fn new(control: RawFd, device: Option<RawFd>) -> Self {
        Self { control, device }
    }
}

impl EventSource for FdPoller {
    fn wait(&mut self) -> Result<Readiness> {
        let mut fds = [
            libc::pollfd {
                fd: self.control,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.device.unwrap_or(-1),
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        let nfds: libc::nfds_t = if self.device.is_some() { 2 } else { 1 };

        loop {
            // SAFETY: `fds` is a valid array of at least `nfds` pollfd entries that
            // outlives the call; a timeout of -1 blocks until an event arrives.
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), nfds, -1) };
            if rc >= 0 {
                break;
            }

            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(TransportError::Poll(err));
        }

        let readiness = Readiness {
            control: fds[0].revents & READY_MASK != 0,
            device: self.device.is_some() && fds[1].revents & READY_MASK != 0,
        };
        trace!(?readiness, "poll woke");
        Ok(readiness)
    }
}
