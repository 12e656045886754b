use crate::error::{Result as ServerErrorResult, ServerError};

use chat_config::LogLevel;

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use fern::FormatCallback;
use log::{Record, info};

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file, never colored
    File(PathBuf),
    Stdout { colored: bool },
}

impl LogTarget {
    pub fn new(log_file: Option<PathBuf>, colored: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path),
            None => Self::Stdout { colored },
        }
    }
}

/// Initialize the global logger with fern.
///
/// Every line is `[<rfc3339> - <LEVEL>] <message> [<file>:<line>]`.
pub fn initialize(log_level: LogLevel, target: LogTarget) -> ServerErrorResult<()> {
    let level_filter = log_level.0;

    let dispatch = match &target {
        LogTarget::File(path) => {
            let file = fern::log_file(path).map_err(|e| ServerError::Logger {
                message: format!("Failed to open log file {}: {e}", path.display()),
            })?;

            Dispatch::new()
                .format(|out, message, record| write_line(out, message, record, record.level()))
                .chain(file)
        }
        LogTarget::Stdout { colored: true } => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            Dispatch::new()
                .format(move |out, message, record| {
                    write_line(out, message, record, colors.color(record.level()))
                })
                .chain(std::io::stdout())
        }
        // Plain output for non-TTY (systemd, docker logs)
        LogTarget::Stdout { colored: false } => Dispatch::new()
            .format(|out, message, record| write_line(out, message, record, record.level()))
            .chain(std::io::stdout()),
    };

    Dispatch::new()
        .level(level_filter)
        .chain(dispatch)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match &target {
        LogTarget::File(path) => info!(
            "Logger initialized: level={}, file={}",
            log_level,
            path.display()
        ),
        LogTarget::Stdout { .. } => info!("Logger initialized: level={}, stdout", log_level),
    }

    Ok(())
}

fn write_line(
    out: FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &Record<'_>,
    level: impl fmt::Display,
) {
    out.finish(format_args!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}
