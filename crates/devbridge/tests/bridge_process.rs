#![cfg(all(unix, feature = "cli"))]

use std::ffi::CString;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use bytes::BytesMut;
use devbridge::dispatch::{CMD_WRITE, NOTIF_DATA, NOTIF_ERROR, NOTIF_RESPONSE};
use devbridge::frame::encode_frame;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/devbridge-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn spawn_bridge(device: &Path, max_rx: &str, max_tx: &str) -> Child {
    Command::new(env!("CARGO_BIN_EXE_devbridge"))
        .arg("--log-level")
        .arg("error")
        .arg(device)
        .arg(max_rx)
        .arg(max_tx)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("bridge should start")
}

fn write_request(token: &[u8], data: &[u8]) -> Vec<u8> {
    let mut payload = vec![CMD_WRITE, token.len() as u8];
    payload.extend_from_slice(token);
    payload.extend_from_slice(data);

    let mut wire = BytesMut::new();
    encode_frame(&payload, &mut wire).expect("request should encode");
    wire.to_vec()
}

fn read_frame(stdout: &mut ChildStdout) -> Vec<u8> {
    let mut header = [0u8; 2];
    stdout
        .read_exact(&mut header)
        .expect("frame header should arrive");
    let mut payload = vec![0u8; u16::from_be_bytes(header) as usize];
    stdout
        .read_exact(&mut payload)
        .expect("frame payload should arrive");
    payload
}

#[test]
fn write_request_gets_correlated_response() {
    let dir = unique_temp_dir("write");
    let device = dir.join("device");
    std::fs::write(&device, b"").expect("device file should be creatable");

    let mut child = spawn_bridge(&device, "0", "64");
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    let mut stdout = child.stdout.take().expect("stdout should be piped");

    stdin
        .write_all(&write_request(b"req-7", b"hello device"))
        .expect("request should send");
    let response = read_frame(&mut stdout);
    assert_eq!(
        response,
        [&[NOTIF_RESPONSE, 5][..], b"req-7", &[0x00, 12]].concat()
    );

    drop(stdin);
    let status = child.wait().expect("bridge should exit");
    assert!(status.success());

    let mut rest = Vec::new();
    stdout.read_to_end(&mut rest).expect("stdout should drain");
    assert!(rest.is_empty(), "no frames after clean shutdown");

    assert_eq!(
        std::fs::read(&device).expect("device should be readable"),
        b"hello device"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn oversized_write_answers_e2big() {
    let dir = unique_temp_dir("e2big");
    let device = dir.join("device");
    std::fs::write(&device, b"").expect("device file should be creatable");

    let mut child = spawn_bridge(&device, "0", "4");
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    let mut stdout = child.stdout.take().expect("stdout should be piped");

    stdin
        .write_all(&write_request(b"t", b"too long"))
        .expect("request should send");
    let response = read_frame(&mut stdout);
    assert_eq!(
        response,
        [&[NOTIF_RESPONSE, 1, b't', 0xFF, 0xFF][..], b"e2big"].concat()
    );

    drop(stdin);
    assert!(child.wait().expect("bridge should exit").success());
    assert!(std::fs::read(&device).expect("device").is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn zero_capacities_report_einval() {
    let output = Command::new(env!("CARGO_BIN_EXE_devbridge"))
        .arg("--log-level")
        .arg("error")
        .arg("/dev/null")
        .arg("0")
        .arg("0")
        .stdin(Stdio::piped())
        .output()
        .expect("bridge should run");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, [&[0x00, 0x07, NOTIF_ERROR][..], b"einval"].concat());
}

#[test]
fn missing_device_reports_enoent() {
    let dir = unique_temp_dir("missing");
    let output = Command::new(env!("CARGO_BIN_EXE_devbridge"))
        .arg("--log-level")
        .arg("error")
        .arg(dir.join("no-such-device"))
        .arg("16")
        .arg("16")
        .stdin(Stdio::piped())
        .output()
        .expect("bridge should run");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, [&[0x00, 0x07, NOTIF_ERROR][..], b"enoent"].concat());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn oversized_frame_is_fatal() {
    let dir = unique_temp_dir("oversize");
    let device = dir.join("device");
    std::fs::write(&device, b"").expect("device file should be creatable");

    let mut child = spawn_bridge(&device, "0", "8");
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    let mut stdout = child.stdout.take().expect("stdout should be piped");

    stdin.write_all(&[0xFF, 0xFF]).expect("header should send");
    let status = child.wait().expect("bridge should exit");
    assert_eq!(status.code(), Some(1));

    assert_eq!(read_frame(&mut stdout), [&[NOTIF_ERROR][..], b"emsgsize"].concat());
    drop(stdin);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn device_data_is_forwarded() {
    let dir = unique_temp_dir("fifo");
    let fifo = dir.join("device");
    let c_path = CString::new(fifo.as_os_str().as_bytes()).expect("path has no NUL");
    // SAFETY: `c_path` is a valid NUL-terminated path for the duration of the call.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    assert_eq!(rc, 0, "mkfifo should succeed");

    let mut child = spawn_bridge(&fifo, "64", "0");
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    let mut stdout = child.stdout.take().expect("stdout should be piped");

    // Opening the write end rendezvouses with the bridge's read-only open.
    let mut writer = OpenOptions::new()
        .write(true)
        .open(&fifo)
        .expect("fifo should open for writing");
    writer.write_all(b"from device").expect("fifo write");

    assert_eq!(read_frame(&mut stdout), [&[NOTIF_DATA][..], b"from device"].concat());

    stdin.flush().expect("stdin flush");
    drop(stdin);
    let status = child.wait().expect("bridge should exit");
    assert!(status.success());

    drop(writer);
    let _ = std::fs::remove_dir_all(&dir);
}
