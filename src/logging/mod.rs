//! Structured logging setup

use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Required for file output
    pub file_path: Option<String>,
    /// Include source file and line numbers
    pub include_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput {
    /// Standard error, so stdout stays clean for exported configs
    Stderr,
    File,
    Both,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "both" => Ok(LogOutput::Both),
            _ => Err(format!("Invalid log output: {}", s)),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            file_path: None,
            include_source: false,
        }
    }
}

impl LogConfig {
    /// Verbose preset used by `--verbose`
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            include_source: true,
            ..Self::default()
        }
    }

    /// Apply `TILERC_LOG_*` variables on top of `self`
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("TILERC_LOG_LEVEL").and_then(|v| v.parse().ok()) {
            self.level = level;
        }

        if let Some(format) = lookup("TILERC_LOG_FORMAT").and_then(|v| v.parse().ok()) {
            self.format = format;
        }

        if let Some(output) = lookup("TILERC_LOG_OUTPUT").and_then(|v| v.parse().ok()) {
            self.output = output;
        }

        if let Some(file_path) = lookup("TILERC_LOG_FILE") {
            self.file_path = Some(file_path);
        }

        if let Some(source) = lookup("TILERC_LOG_SOURCE") {
            self.include_source = source.eq_ignore_ascii_case("true");
        }

        self
    }

    pub fn from_env() -> Self {
        Self::default().with_env()
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter(config);

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if matches!(config.output, LogOutput::Stderr | LogOutput::Both) {
        layers.push(create_layer(config, std::io::stderr));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        let path = config
            .file_path
            .as_deref()
            .ok_or("File path required for file output")?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        layers.push(create_layer(config, std::sync::Mutex::new(file)));
    }

    tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init()?;

    info!(level = ?config.level, format = ?config.format, output = ?config.output, "Logging initialized");
    Ok(())
}

fn create_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tilerc={}", config.level.as_directive())))
}

fn create_layer<W>(config: &LogConfig, writer: W) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_timer(UtcTime::rfc_3339())
        .with_file(config.include_source)
        .with_line_number(config.include_source);

    match config.format {
        LogFormat::Pretty => Box::new(layer.pretty()),
        LogFormat::Compact => Box::new(layer.compact()),
        LogFormat::Json => Box::new(layer.json()),
    }
}
