//! Agent Logger Port - side-effect only logging capability.
//!
//! Never consulted for control flow. Metadata is structured JSON so adapters
//! can forward it as fields.

use serde_json::Value;

pub trait AgentLogger: Send + Sync {
    fn info(&self, message: &str, meta: &Value);

    fn warn(&self, message: &str, meta: &Value);

    fn error(&self, message: &str, meta: &Value);
}
