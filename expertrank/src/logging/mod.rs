//! Structured logging infrastructure for expertrank.
//!
//! Provides a configurable logging setup based on the tracing crate. The
//! pipeline itself only emits `tracing` events; hosts that already install
//! their own subscriber can skip this module entirely.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

use crate::config::{LogFormat, LogLevel, LoggingConfig};

/// Error type for logging operations
#[derive(Debug)]
pub enum LogError {
    /// IO error occurred
    IoError(std::io::Error),

    /// Error in subscriber setup
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
        }
    }
}

impl std::error::Error for LogError {}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// When a log file is configured, the returned [`WorkerGuard`] must be held
/// by the caller for the lifetime of the program; dropping it stops the
/// background writer and loses buffered output. Initializing when a global
/// subscriber is already installed is tolerated and returns `Ok(None)`.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match config.level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };

    let result = match config.format {
        LogFormat::Json => init_json_logging(level, config),
        LogFormat::Compact => init_compact_logging(level, config),
        LogFormat::Full => init_full_logging(level, config),
    };

    // If a subscriber is already set, leave it alone
    if let Err(LogError::SubscriberError(ref e)) = result
        && e.to_string().contains("already been set")
    {
        return Ok(None);
    }

    result
}

/// Initialize logging with JSON formatting
fn init_json_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_level(true)
        .with_target(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Initialize logging with compact formatting
fn init_compact_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_level(true)
        .with_target(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Initialize logging with full human-readable formatting
fn init_full_logging(level: Level, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_level(true)
        .with_target(true);

    if let Some(file_path) = &config.file {
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("Configured for stdout only; file logging ignored");
            Ok(None)
        } else {
            let (writer, guard) = create_non_blocking_file(file_path)?;
            subscriber.with_writer(writer).try_init()?;
            Ok(Some(guard))
        }
    } else {
        if config.stdout {
            subscriber.try_init()?;
        }
        Ok(None)
    }
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name().unwrap_or_default(),
    );

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}
