//! AgentLogger over `tracing`.

use serde_json::Value;

use crate::ports::AgentLogger;

/// Forwards agent log lines to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

fn agent_of(meta: &Value) -> &str {
    meta.get("agent").and_then(Value::as_str).unwrap_or("-")
}

impl AgentLogger for TracingLogger {
    fn info(&self, message: &str, meta: &Value) {
        tracing::info!(agent = %agent_of(meta), meta = %meta, "{}", message);
    }

    fn warn(&self, message: &str, meta: &Value) {
        tracing::warn!(agent = %agent_of(meta), meta = %meta, "{}", message);
    }

    fn error(&self, message: &str, meta: &Value) {
        tracing::error!(agent = %agent_of(meta), meta = %meta, "{}", message);
    }
}
