//! File-backed log sink with a fixed, column-aligned line format.
//!
//! Lines look like `2024-06-01T00:00:00+0200 INFO  [version_manifest] message key=value`.
//! The sink is a value: work runs inside [`Logger::in_scope`] instead of
//! installing a process-wide subscriber.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{Dispatch, Event, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// ISO-8601 timestamp layout, local time with numeric offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// What: Shorten long level names so every level fits in five columns.
///
/// Inputs:
/// - `name`: Upper-case level name
///
/// Output:
/// - `WARN` for `WARNING`, `FATAL` for `CRITICAL`, otherwise `name` unchanged
///
/// Details:
/// - `tracing` level names already fit and pass through untouched. The long
///   spellings only arrive from foreign level names, such as records bridged
///   from other logging frameworks.
#[must_use]
pub fn normalize_level_name(name: &str) -> &str {
    match name {
        "WARNING" => "WARN",
        "CRITICAL" => "FATAL",
        other => other,
    }
}

/// Event formatter producing `<timestamp> <LEVEL> [<name>] <fields>`.
#[derive(Debug, Clone)]
pub struct LineFormat {
    /// Logger name shown in brackets.
    name: String,
}

impl LineFormat {
    /// Formatter that tags every line with `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = normalize_level_name(event.metadata().level().as_str());
        write!(
            writer,
            "{} {level:<5} [{}] ",
            Local::now().format(TIMESTAMP_FORMAT),
            self.name
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Append-mode file logger capturing INFO and above.
pub struct Logger {
    /// Subscriber used for everything run through [`Logger::in_scope`].
    dispatch: Dispatch,
    /// Log file receiving the lines.
    path: PathBuf,
}

impl Logger {
    /// What: Create the log directory and open the log file for appending.
    ///
    /// Inputs:
    /// - `config`: Log directory, file name and logger name
    ///
    /// Output:
    /// - `Logger` writing synchronously to `config.path()`
    ///
    /// # Errors
    /// - Returns `Err(Error::Io)` when the log directory cannot be created
    /// - Returns `Err(Error::LogInit)` when the log file cannot be opened
    ///
    /// Details:
    /// - Directory creation is idempotent; existing log content is kept.
    pub fn new(config: &LogConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.dir).map_err(Error::io(&config.dir))?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(config.file_name.as_str())
            .build(&config.dir)?;
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::INFO)
            .with_ansi(false)
            .with_writer(appender)
            .event_format(LineFormat::new(config.name.as_str()))
            .finish();
        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            path: config.path(),
        })
    }

    /// Run `f` with this logger receiving every event it emits.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// What: Build a logger writing into a fresh temp directory.
    ///
    /// Output:
    /// - Temp dir guard and a `LogConfig` for `<tmp>/logs/test.log`
    fn temp_log_config() -> (TempDir, LogConfig) {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let config = LogConfig {
            dir: tmp.path().join("logs"),
            file_name: "test.log".to_string(),
            name: "test".to_string(),
        };
        (tmp, config)
    }

    #[test]
    fn level_names_fit_five_columns() {
        assert_eq!(normalize_level_name("WARNING"), "WARN");
        assert_eq!(normalize_level_name("CRITICAL"), "FATAL");
        for level in ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"] {
            assert_eq!(normalize_level_name(level), level);
            assert!(level.len() <= 5);
        }
    }

    /// What: Lines carry an ISO-8601 timestamp, a padded level and the logger name.
    ///
    /// Inputs:
    /// - One INFO, one WARN, one ERROR and one DEBUG event
    ///
    /// Output:
    /// - Three lines in the file; DEBUG is filtered out
    ///
    /// Details:
    /// - Parses the timestamp back with `TIMESTAMP_FORMAT`.
    #[test]
    fn logger_writes_column_aligned_lines() {
        let (_tmp, config) = temp_log_config();
        let logger = Logger::new(&config).expect("logger");
        assert!(config.dir.is_dir());

        logger.in_scope(|| {
            tracing::info!("first message");
            tracing::warn!(attempt = 2, "second message");
            tracing::error!("third message");
            tracing::debug!("never written");
        });

        let text = std::fs::read_to_string(logger.path()).expect("read log");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3, "unexpected log: {text}");

        let expected = [
            ("INFO ", "first message"),
            ("WARN ", "second message attempt=2"),
            ("ERROR", "third message"),
        ];
        for (line, (level, message)) in lines.iter().zip(expected) {
            let (stamp, rest) = line.split_once(' ').expect("timestamp separator");
            chrono::DateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
                .unwrap_or_else(|e| panic!("bad timestamp {stamp:?}: {e}"));
            assert_eq!(&rest[..5], level);
            assert_eq!(&rest[5..], format!(" [test] {message}"));
        }
    }

    #[test]
    fn logger_appends_across_instances() {
        let (_tmp, config) = temp_log_config();

        let first = Logger::new(&config).expect("first logger");
        first.in_scope(|| tracing::info!("run one"));
        drop(first);

        let second = Logger::new(&config).expect("second logger");
        second.in_scope(|| tracing::info!("run two"));

        let text = std::fs::read_to_string(config.path()).expect("read log");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("run one"));
        assert!(lines[1].ends_with("run two"));
    }

    /// What: Events outside the scope do not reach the file.
    ///
    /// Inputs:
    /// - An event emitted before `in_scope` is entered
    ///
    /// Output:
    /// - Only the scoped event is recorded
    #[test]
    fn events_outside_scope_are_not_recorded() {
        let (_tmp, config) = temp_log_config();
        let logger = Logger::new(&config).expect("logger");

        tracing::info!("outside");
        logger.in_scope(|| tracing::info!("inside"));

        let text = std::fs::read_to_string(logger.path()).expect("read log");
        assert!(!text.contains("outside"));
        assert!(text.contains("inside"));
    }

    #[test]
    fn logger_fails_when_log_dir_is_a_file() {
        let (tmp, mut config) = temp_log_config();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").expect("write blocker");
        config.dir = blocker.join("logs");

        let err = Logger::new(&config).expect_err("directory creation must fail");
        assert!(matches!(err, Error::Io { .. }), "unexpected error: {err}");
    }
}
