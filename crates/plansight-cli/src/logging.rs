//! Logging setup for the command-line tool
//!
//! Diagnostics go to stderr so stdout stays clean for rendered output.
//! `RUST_LOG` takes precedence over the verbosity flags.

use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output on stderr
    pub json: bool,
    /// Also write JSON logs to a daily rolling file in this directory
    pub log_dir: Option<PathBuf>,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            log_dir: None,
            include_location: cfg!(debug_assertions),
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter for the number of `-v` flags given
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.default_filter = match verbose {
            0 => "warn",
            1 => "info,plansight_explain=debug",
            2 => "debug",
            _ => "trace",
        }
        .to_string();
        self
    }
}

pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();

    let console_layer = if config.json {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .json()
            .with_filter(env_filter.clone())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .with_filter(env_filter.clone())
            .boxed()
    };
    layers.push(console_layer);

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;
        let file_appender = tracing_appender::rolling::daily(log_dir, "plansight.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // The process is short-lived; the guard has to outlive every log call.
        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(file_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        json = config.json,
        log_dir = ?config.log_dir,
        "logging initialized"
    );
    Ok(())
}
