//! Leveled logging interface passed to pipeline components.
//!
//! Components never reach for a global logger; they receive an
//! [`ExportLog`] so callers decide where messages go. The binary uses
//! [`TracingLog`], tests use [`MemoryLog`] to assert on output.

use std::fmt;
use std::sync::Mutex;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Progress and summaries.
    Info,
    /// Recoverable problems (e.g. a missing attachment).
    Warn,
    /// A record or operation failed.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Sink for pipeline log messages.
pub trait ExportLog: Send + Sync {
    /// Records a message at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Records a debug message.
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Records an informational message.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Records a warning.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Records an error.
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Forwards messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ExportLog for TracingLog {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// Captures messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all captured entries.
    #[must_use]
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns the messages captured at exactly `level`.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl ExportLog for MemoryLog {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}
