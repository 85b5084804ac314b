//! In-memory agent memory.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{AgentMemory, MemoryError};

/// Process-local memory. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentMemory {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryAgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl AgentMemory for InMemoryAgentMemory {
    async fn load(&self, key: &str) -> Result<Option<Value>, MemoryError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), MemoryError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn append(&self, key: &str, value: Value) -> Result<(), MemoryError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        match entry {
            Value::Array(items) => items.push(value),
            // A scalar saved earlier becomes the first element of the list.
            other => {
                let previous = other.take();
                *other = Value::Array(vec![previous, value]);
            }
        }
        Ok(())
    }
}
