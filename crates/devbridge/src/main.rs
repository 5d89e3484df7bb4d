mod exit;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use devbridge_dispatch::{run_stdio, BridgeConfig};

use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "devbridge",
    version,
    about = "Bridge a device file to a length-prefixed stdin/stdout protocol"
)]
struct Cli {
    /// Device to open.
    device: PathBuf,

    /// Most bytes read from the device per DATA notification (0 = never read).
    #[arg(value_parser = parse_size)]
    max_rx: usize,

    /// Most bytes written to the device per request (0 = never write).
    #[arg(value_parser = parse_size)]
    max_tx: usize,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "DEVBRIDGE_LOG_FORMAT"
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "DEVBRIDGE_LOG_LEVEL"
    )]
    log_level: LogLevel,
}

/// Parse a size as strict decimal, `0x` hexadecimal or `0`-prefixed octal.
///
/// The whole argument must be digits of the chosen base: `12ab` and `08` are
/// rejected rather than truncated.
fn parse_size(raw: &str) -> Result<usize, String> {
    let raw = raw.trim();
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else if raw.len() > 1 && raw.starts_with('0') {
        usize::from_str_radix(&raw[1..], 8)
    } else {
        raw.parse::<usize>()
    };
    parsed.map_err(|err| format!("invalid size {raw:?}: {err}"))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        target = option_env!("DEVBRIDGE_BUILD_TARGET").unwrap_or("unknown"),
        profile = option_env!("DEVBRIDGE_BUILD_PROFILE").unwrap_or("unknown"),
        device = %cli.device.display(),
        max_rx = cli.max_rx,
        max_tx = cli.max_tx,
        "starting devbridge"
    );

    let config = BridgeConfig::new(cli.device, cli.max_rx, cli.max_tx);
    let outcome = run_stdio(&config);
    std::process::exit(exit::code_for(&outcome));
}
