//! AgentLogger that keeps every entry, for assertions in tests.

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::AgentLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub meta: Value,
}

/// Clones share the same entry list.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str, meta: &Value) {
        self.lock().push(LogEntry {
            level,
            message: message.to_string(),
            meta: meta.clone(),
        });
    }
}

impl AgentLogger for RecordingLogger {
    fn info(&self, message: &str, meta: &Value) {
        self.record(LogLevel::Info, message, meta);
    }

    fn warn(&self, message: &str, meta: &Value) {
        self.record(LogLevel::Warn, message, meta);
    }

    fn error(&self, message: &str, meta: &Value) {
        self.record(LogLevel::Error, message, meta);
    }
}
