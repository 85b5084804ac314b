//! Agent Memory Port - key/value scratch space available to agents.
//!
//! Part of the agent context contract. None of the current agents read or
//! write memory, but callers may supply one and custom hooks may use it.

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Failed to serialize memory entry: {0}")]
    Serialization(String),

    #[error("Memory backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait AgentMemory: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn load(&self, key: &str) -> Result<Option<Value>, MemoryError>;

    /// Overwrites the value stored under `key`.
    async fn save(&self, key: &str, value: Value) -> Result<(), MemoryError>;

    /// Appends to the list stored under `key`, creating it if needed.
    async fn append(&self, key: &str, value: Value) -> Result<(), MemoryError>;
}
