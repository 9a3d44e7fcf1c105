//! Logging initialization using the `tracing` ecosystem.
//!
//! Console output always goes to stderr: stdout is reserved for the trade
//! records the runner prints. An optional file layer rotates daily via
//! `tracing-appender` and can emit JSON lines instead of text.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the file layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// `RUST_LOG` if set and valid, else `log_level`, else `info`.
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber with a text file layer.
///
/// # Parameters
///
/// - `log_level`: default level if `RUST_LOG` env var is not set (e.g. `"info"`)
/// - `log_dir`: optional directory for daily-rotating log files
/// - `module_name`: used as the log file prefix (e.g. `"pt-runner"`)
pub fn init_logging(log_level: &str, log_dir: Option<&str>, module_name: &str) {
    init_logging_with_format(log_level, log_dir, module_name, LogFormat::Text);
}

/// Same as [`init_logging`] with an explicit file format.
///
/// Call once at program start; a second call leaves the first subscriber in
/// place.
pub fn init_logging_with_format(log_level: &str, log_dir: Option<&str>, module_name: &str, format: LogFormat) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, module_name);
        match format {
            LogFormat::Text => fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(appender).with_target(true).boxed(),
        }
    });

    let result = tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if result.is_err() {
        tracing::debug!("[logging] subscriber already installed");
    }
}
