use chrono::Local;
use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Timestamp layout shared by console and file output, with microseconds
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %:z";

/// Log levels in order of increasing severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(LoggerError::UnknownLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log level '{0}' (expected trace, debug, info, warning or error)")]
    UnknownLevel(String),

    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Append to this file instead of writing to stderr
    pub log_file: Option<PathBuf>,
    /// Minimum log level to record
    pub min_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            log_file: None,
            min_level: LogLevel::Info,
        }
    }
}

/// Local wall-clock timestamps for log lines
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Install the global `tracing` subscriber.
///
/// Can only succeed once per process; later calls return
/// `LoggerError::Install`.
///
/// # Example
///
/// ```no_run
/// use common::logger::{self, LogLevel, LoggerConfig};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// logger::init(&LoggerConfig {
///     log_file: Some("viewer.log".into()),
///     min_level: LogLevel::Debug,
/// })?;
/// tracing::info!("logging to viewer.log");
/// # Ok(())
/// # }
/// ```
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(Level::from(config.min_level))
        .with_timer(LocalTimestamp)
        .with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| LoggerError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(LoggerError::UnknownLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn levels_map_onto_tracing() {
        assert_eq!(Level::from(LogLevel::Warning), Level::WARN);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn file_logger_writes_timestamped_lines() {
        let path = std::env::temp_dir().join(format!("viewer-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        init(&LoggerConfig {
            log_file: Some(path.clone()),
            min_level: LogLevel::Debug,
        })
        .unwrap();
        tracing::debug!("hello from the test");
        tracing::trace!("filtered out");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello from the test"));
        assert!(!contents.contains("filtered out"));
        assert!(contents.starts_with(&Local::now().format("%Y-%m-%d").to_string()));

        assert!(matches!(
            init(&LoggerConfig::default()),
            Err(LoggerError::Install(_))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
