use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Directive variable that overrides `--log-level`, e.g.
/// `DEVBRIDGE_LOG=devbridge_frame=trace,info`.
pub const FILTER_ENV: &str = "DEVBRIDGE_LOG";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Build the filter: `directives` when present and parseable, else `level`.
fn build_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(level.directive()))
}

/// Log to stderr. Stdout carries the framed protocol and must never see a log line.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let directives = std::env::var(FILTER_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(level, directives.as_deref()))
        .with_ansi(false)
        .with_target(directives.is_some());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
