//! POSIX error names for in-band error reports.
//!
//! Failures cross the control channel as lowercase symbolic names (`"eacces"`,
//! `"enoent"`, ...) rather than raw numbers, since errno values differ between
//! platforms while the names do not.

use std::io::{self, ErrorKind};

/// Name reported for any errno outside the table below.
pub const FALLBACK_NAME: &str = "ebadmsg";

/// Map an errno value to its lowercase POSIX name.
pub fn errno_name(errnum: i32) -> &'static str {
    match errnum {
        libc::EPERM => "eperm",
        libc::ENOENT => "enoent",
        libc::ESRCH => "esrch",
        libc::EINTR => "eintr",
        libc::EIO => "eio",
        libc::ENXIO => "enxio",
        libc::E2BIG => "e2big",
        libc::ENOEXEC => "enoexec",
        libc::EBADF => "ebadf",
        libc::ECHILD => "echild",
        libc::EAGAIN => "eagain",
        libc::ENOMEM => "enomem",
        libc::EACCES => "eacces",
        libc::EFAULT => "efault",
        libc::ENOTBLK => "enotblk",
        libc::EBUSY => "ebusy",
        libc::EEXIST => "eexist",
        libc::EXDEV => "exdev",
        libc::ENODEV => "enodev",
        libc::ENOTDIR => "enotdir",
        libc::EISDIR => "eisdir",
        libc::EINVAL => "einval",
        libc::ENFILE => "enfile",
        libc::EMFILE => "emfile",
        libc::ENOTTY => "enotty",
        libc::ETXTBSY => "etxtbsy",
        libc::EFBIG => "efbig",
        libc::ENOSPC => "enospc",
        libc::ESPIPE => "espipe",
        libc::EROFS => "erofs",
        libc::EMLINK => "emlink",
        libc::EPIPE => "epipe",
        libc::EDOM => "edom",
        libc::ERANGE => "erange",
        libc::EDEADLK => "edeadlk",
        libc::ENAMETOOLONG => "enametoolong",
        libc::ENOLCK => "enolck",
        libc::ENOSYS => "enosys",
        libc::ENOTEMPTY => "enotempty",
        libc::ELOOP => "eloop",
        libc::ENOMSG => "enomsg",
        libc::EIDRM => "eidrm",
        libc::EPROTO => "eproto",
        libc::EOVERFLOW => "eoverflow",
        libc::EILSEQ => "eilseq",
        libc::ENOTSOCK => "enotsock",
        libc::EMSGSIZE => "emsgsize",
        libc::ENOTSUP => "enotsup",
        libc::EADDRINUSE => "eaddrinuse",
        libc::ENETDOWN => "enetdown",
        libc::ECONNABORTED => "econnaborted",
        libc::ECONNRESET => "econnreset",
        libc::ENOBUFS => "enobufs",
        libc::ENOTCONN => "enotconn",
        libc::ETIMEDOUT => "etimedout",
        libc::ECONNREFUSED => "econnrefused",
        libc::EHOSTUNREACH => "ehostunreach",
        libc::EALREADY => "ealready",
        libc::EINPROGRESS => "einprogress",
        libc::ECANCELED => "ecanceled",
        _ => FALLBACK_NAME,
    }
}

/// Name an `io::Error`.
///
/// OS errors use their errno. Synthetic errors (no errno attached) are named
/// after the closest POSIX code for their kind.
pub fn io_error_name(err: &io::Error) -> &'static str {
    if let Some(errnum) = err.raw_os_error() {
        return errno_name(errnum);
    }

    match err.kind() {
        ErrorKind::NotFound => "enoent",
        ErrorKind::PermissionDenied => "eacces",
        ErrorKind::Interrupted => "eintr",
        ErrorKind::WouldBlock => "eagain",
        ErrorKind::InvalidInput => "einval",
        ErrorKind::BrokenPipe => "epipe",
        ErrorKind::AlreadyExists => "eexist",
        ErrorKind::TimedOut => "etimedout",
        ErrorKind::OutOfMemory => "enomem",
        ErrorKind::Unsupported => "enotsup",
        ErrorKind::WriteZero | ErrorKind::UnexpectedEof => "eio",
        _ => FALLBACK_NAME,
    }
}
