use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, TransportError};

/// How the device is opened, derived from the configured transfer capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    /// Derive the access mode from the per-notification read capacity and the
    /// per-request write capacity.
    ///
    /// Both capacities zero is rejected: such a device could never be used.
    pub fn from_capacities(max_rx: usize, max_tx: usize) -> Result<Self> {
        match (max_rx > 0, max_tx > 0) {
            (true, true) => Ok(AccessMode::ReadWrite),
            (true, false) => Ok(AccessMode::ReadOnly),
            (false, true) => Ok(AccessMode::WriteOnly),
            (false, false) => Err(TransportError::InvalidAccessMode),
        }
    }

    pub fn readable(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }

    /// Short name for diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "read-only",
            AccessMode::WriteOnly => "write-only",
            AccessMode::ReadWrite => "read-write",
        }
    }
}

/// The open backing device.
///
/// Reads and writes map to exactly one `read(2)`/`write(2)` each; there is no
/// userspace buffering between the bridge and the descriptor.
pub struct Device {
    file: File,
    path: PathBuf,
    mode: AccessMode,
}

impl Device {
    /// Open the device at `path` with the given access mode.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(mode.readable())
            .write(mode.writable())
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;

        info!(?path, mode = mode.as_str(), "opened device");

        Ok(Self { file, path, mode })
    }

    /// Path the device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

impl Read for Device {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for Device {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl AsRawFd for Device {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_device(tag: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "devbridge-device-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dev");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn access_mode_from_capacities() {
        assert_eq!(
            AccessMode::from_capacities(16, 16).unwrap(),
            AccessMode::ReadWrite
        );
        assert_eq!(
            AccessMode::from_capacities(16, 0).unwrap(),
            AccessMode::ReadOnly
        );
        assert_eq!(
            AccessMode::from_capacities(0, 16).unwrap(),
            AccessMode::WriteOnly
        );
        assert!(matches!(
            AccessMode::from_capacities(0, 0),
            Err(TransportError::InvalidAccessMode)
        ));
    }

    #[test]
    fn access_mode_flags() {
        assert!(AccessMode::ReadWrite.readable() && AccessMode::ReadWrite.writable());
        assert!(AccessMode::ReadOnly.readable() && !AccessMode::ReadOnly.writable());
        assert!(!AccessMode::WriteOnly.readable() && AccessMode::WriteOnly.writable());
    }

    #[test]
    fn read_only_device_reads() {
        let path = temp_device("ro", b"abc");
        let mut device = Device::open(&path, AccessMode::ReadOnly).unwrap();

        let mut buf = [0u8; 8];
        let n = device.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"abc");
        assert!(device.write(b"x").is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn write_only_device_writes() {
        let path = temp_device("wo", b"");
        let mut device = Device::open(&path, AccessMode::WriteOnly).unwrap();

        assert_eq!(device.write(b"hello").unwrap(), 5);
        let mut buf = [0u8; 4];
        assert!(device.read(&mut buf).is_err());
        drop(device);

        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_device_is_open_error() {
        let err = Device::open("/nonexistent/devbridge/tty", AccessMode::ReadWrite).unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
        assert_eq!(err.posix_name(), "enoent");
    }
}
