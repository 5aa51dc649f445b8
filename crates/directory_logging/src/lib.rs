#![deny(missing_docs)]
//! Shared logging utilities for the directory workspace.
//!
//! This crate provides the `directory_*` logging macros used across the
//! codebase, the logger setup used by the app shell, and a minimal test
//! initializer for the global logger.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const LOG_FILE: &str = "./directory.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! directory_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! directory_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! directory_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! directory_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! directory_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to [`LOG_FILE`].
    #[default]
    File,
    /// Write to stderr, keeping stdout for the rendered directory.
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Returned when a log destination name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDestination(
    /// The rejected name, as given.
    pub String,
);

impl fmt::Display for UnknownDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown log destination '{}' (expected file, terminal or both)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDestination {}

impl FromStr for LogDestination {
    type Err = UnknownDestination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "terminal" | "term" => Ok(Self::Terminal),
            "both" => Ok(Self::Both),
            _ => Err(UnknownDestination(s.to_string())),
        }
    }
}

/// Initialize the global logger with the specified destination.
///
/// For `LogDestination::File` or `Both`, truncates and writes [`LOG_FILE`].
/// A second call is ignored.
pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config, Path::new(LOG_FILE)) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config, Path::new(LOG_FILE)) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {log_path:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_parses_known_names() {
        assert_eq!("file".parse::<LogDestination>(), Ok(LogDestination::File));
        assert_eq!(" Terminal ".parse::<LogDestination>(), Ok(LogDestination::Terminal));
        assert_eq!("BOTH".parse::<LogDestination>(), Ok(LogDestination::Both));
    }

    #[test]
    fn destination_rejects_unknown_name() {
        let err = "syslog".parse::<LogDestination>().unwrap_err();
        assert_eq!(err, UnknownDestination("syslog".to_string()));
        assert!(err.to_string().contains("syslog"));
    }
}
