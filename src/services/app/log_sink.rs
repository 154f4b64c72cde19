//! Injectable log destination for the extraction job.
//!
//! The job never writes to stdout itself. Callers hand it a [`LogSink`]:
//! the CLI uses [`LogCrateSink`] (routed through the `log` facade and
//! `env_logger`), tests use [`SilentSink`] or [`CollectingSink`].

use log::Level;
use std::sync::Mutex;

pub trait LogSink {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards every line to the global `log` facade under a fixed target.
pub struct LogCrateSink {
    target: &'static str,
}

impl LogCrateSink {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogCrateSink {
    fn default() -> Self {
        Self::new("excel_image_extractor")
    }
}

impl LogSink for LogCrateSink {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{}", message);
    }
}

/// Drops everything.
#[derive(Default)]
pub struct SilentSink;

impl LogSink for SilentSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Keeps every line in memory, in order.
#[derive(Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for CollectingSink {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "tests/log_sink_tests.rs"]
mod tests;
