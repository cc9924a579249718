// Logger

use std::fmt;

use chrono::Local;

use super::config::LogConfig;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        };

        write!(f, "[{}]", tag)
    }
}

/// Leveled logger writing timestamped lines to the standard output
///
/// With trace enabled, lines go to the standard error instead,
/// so heavy traffic logs can be separated from the rest.
pub struct Logger {
    /// Configuration
    pub config: LogConfig,
}

impl Logger {
    /// Creates new logger
    pub fn new(config: LogConfig) -> Logger {
        Logger { config }
    }

    /// Creates a logger with every level disabled
    #[cfg(test)]
    pub fn new_disabled() -> Logger {
        Logger {
            config: LogConfig::disabled(),
        }
    }

    /// Makes child logger, adding a prefix to every line
    pub fn make_child_logger(&self, prefix: &str) -> Logger {
        Logger {
            config: self.config.child_config(prefix),
        }
    }

    /// Checks if a level is enabled
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error => self.config.error_enabled,
            LogLevel::Warning => self.config.warning_enabled,
            LogLevel::Info => self.config.info_enabled,
            LogLevel::Debug => self.config.debug_enabled,
            LogLevel::Trace => self.config.trace_enabled,
        }
    }

    /// Formats a line with the time, the prefix and the level
    pub fn format_line(&self, level: LogLevel, line: &str) -> String {
        format!(
            "{} {}{} {}",
            Local::now().format("[%Y-%m-%d %H:%M:%S]"),
            self.config.prefix,
            level,
            line
        )
    }

    /// Logs a line, if the level is enabled
    pub fn log(&self, level: LogLevel, line: &str) {
        if !self.is_enabled(level) {
            return;
        }

        if self.config.trace_enabled {
            eprintln!("{}", self.format_line(level, line));
        } else {
            println!("{}", self.format_line(level, line));
        }
    }
}

// Tests
