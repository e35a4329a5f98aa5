//! # Logging Utilities
//!
//! Logging infrastructure for Codeview using `tracing`.
//!
//! Console output goes to stderr so that it never mixes with rendered records
//! on stdout. Logs can additionally (or instead) be written to a file through
//! a non-blocking `tracing-appender` writer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codeview_utils::{init_logging, LoggingConfig};
//!
//! // Reads RUST_LOG, CODEVIEW_LOG_FORMAT and CODEVIEW_LOG_FILE.
//! let _guard = init_logging(&LoggingConfig::from_env()).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=codeview_core=trace`)
//! - `CODEVIEW_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `CODEVIEW_LOG_FILE`: Optional path to a log file written next to console output

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    #[default]
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Where and how logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig
{
    /// Explicit level; `None` defers to `RUST_LOG`, then `warn`.
    pub level: Option<LogLevel>,
    /// Output format for every sink.
    pub format: LogFormat,
    /// Optional log file.
    pub file: Option<PathBuf>,
    /// Whether to log to stderr.
    pub console: bool,
}

impl Default for LoggingConfig
{
    fn default() -> Self
    {
        Self {
            level: None,
            format: LogFormat::Pretty,
            file: None,
            console: true,
        }
    }
}

impl LoggingConfig
{
    /// Build a config from `CODEVIEW_LOG_FORMAT` and `CODEVIEW_LOG_FILE`.
    ///
    /// Unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self
    {
        Self::from_vars(
            env::var("CODEVIEW_LOG_FORMAT").ok().as_deref(),
            env::var("CODEVIEW_LOG_FILE").ok().as_deref(),
        )
    }

    fn from_vars(format: Option<&str>, file: Option<&str>) -> Self
    {
        Self {
            format: format.and_then(|s| LogFormat::from_str(s).ok()).unwrap_or_default(),
            file: file.filter(|path| !path.is_empty()).map(PathBuf::from),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self
    {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self
    {
        self.format = format;
        self
    }

    /// Log only to `<dir>/YYYY-MM-DD-codeview.log`, keeping the console clean.
    #[must_use]
    pub fn with_log_dir(mut self, dir: &Path) -> Self
    {
        let today = Utc::now().format("%Y-%m-%d");
        self.file = Some(dir.join(format!("{today}-codeview.log")));
        self.console = false;
        self
    }

    // Explicit level first, then RUST_LOG (module filters allowed), then WARN.
    fn filter(&self) -> EnvFilter
    {
        if let Some(level) = self.level {
            EnvFilter::new(Level::from(level).to_string())
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
        }
    }
}

/// Keeps the background file writer alive; drop it to flush.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The log file directory cannot be created
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError>
{
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = LoggingGuard::default();

    if config.console {
        layers.push(fmt_layer(config.format, io::stderr, true, config.filter()));
    }

    if let Some(path) = &config.file {
        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
        std::fs::create_dir_all(dir)?;

        let (writer, file_guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        layers.push(fmt_layer(config.format, writer, false, config.filter()));
        guard._file = Some(file_guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;
    Ok(guard)
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());

    match format {
        LogFormat::Pretty => layer.with_ansi(ansi).with_filter(filter).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Log file path has no file name
    #[error("Invalid log file path: {0}")]
    InvalidPath(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_config_from_vars()
    {
        let config = LoggingConfig::from_vars(Some("json"), Some("/tmp/codeview.log"));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/codeview.log")));
        assert!(config.console);

        let fallback = LoggingConfig::from_vars(Some("xml"), Some(""));
        assert_eq!(fallback, LoggingConfig::default());
    }

    #[test]
    fn test_log_dir_is_file_only_and_dated()
    {
        let config = LoggingConfig::default()
            .with_level(LogLevel::Debug)
            .with_log_dir(Path::new("/var/log/codeview"));
        assert!(!config.console);
        assert_eq!(config.level, Some(LogLevel::Debug));

        let file = config.file.unwrap();
        assert_eq!(file.parent(), Some(Path::new("/var/log/codeview")));
        let name = file.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("-codeview.log"));
        assert_eq!(name.len(), "YYYY-MM-DD-codeview.log".len());
    }
}
