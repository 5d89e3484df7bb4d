use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};

use crate::error::Result;

/// One direction of the control channel.
///
/// The standard library's `Stdin`/`Stdout` buffer in userspace. A byte sitting
/// in that buffer is invisible to `poll(2)`, so the bridge instead works on
/// duplicated descriptors where every `read`/`write` is one syscall.
pub struct ControlStream {
    inner: File,
    name: &'static str,
}

impl ControlStream {
    /// Unbuffered handle on the process's standard input.
    pub fn stdin() -> Result<Self> {
        let fd = std::io::stdin().as_fd().try_clone_to_owned()?;
        Ok(Self::from_owned_fd(fd, "stdin"))
    }

    /// Unbuffered handle on the process's standard output.
    pub fn stdout() -> Result<Self> {
        let fd = std::io::stdout().as_fd().try_clone_to_owned()?;
        Ok(Self::from_owned_fd(fd, "stdout"))
    }

    /// Wrap an already-open descriptor (a pipe end, a socket, ...).
    pub fn from_owned_fd(fd: OwnedFd, name: &'static str) -> Self {
        Self {
            inner: File::from(fd),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Read for ControlStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for ControlStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl AsRawFd for ControlStream {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

impl std::fmt::Debug for ControlStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlStream")
            .field("name", &self.name)
            .field("fd", &self.inner.as_raw_fd())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;

    #[test]
    fn reads_and_writes_through_wrapped_fd() {
        let (left, right) = UnixStream::pair().unwrap();
        let mut writer = ControlStream::from_owned_fd(OwnedFd::from(left), "left");
        let mut reader = ControlStream::from_owned_fd(OwnedFd::from(right), "right");

        writer.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();

        assert_eq!(&buf, b"ping");
        assert_eq!(writer.name(), "left");
    }
}
