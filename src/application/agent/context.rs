//! Agent context - the capabilities an invocation runs with.

use std::fmt;
use std::sync::Arc;

use crate::ports::{AgentLogger, AgentMemory, LanguageModelClient};

/// Capabilities available to an agent invocation.
///
/// Cloning is cheap; every capability is shared behind an `Arc`. A context
/// is never mutated after construction: [`AgentContext::merge`] returns a
/// new one.
#[derive(Clone)]
pub struct AgentContext {
    client: Arc<dyn LanguageModelClient>,
    memory: Option<Arc<dyn AgentMemory>>,
    logger: Option<Arc<dyn AgentLogger>>,
}

impl AgentContext {
    pub fn new(client: Arc<dyn LanguageModelClient>) -> Self {
        Self {
            client,
            memory: None,
            logger: None,
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn AgentMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AgentLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn client(&self) -> &Arc<dyn LanguageModelClient> {
        &self.client
    }

    pub fn memory(&self) -> Option<&Arc<dyn AgentMemory>> {
        self.memory.as_ref()
    }

    pub fn logger(&self) -> Option<&Arc<dyn AgentLogger>> {
        self.logger.as_ref()
    }

    /// Returns a new context with the overrides applied on top of this one.
    pub fn merge(&self, overrides: ContextOverrides) -> Self {
        Self {
            client: overrides.client.unwrap_or_else(|| Arc::clone(&self.client)),
            memory: overrides.memory.or_else(|| self.memory.clone()),
            logger: overrides.logger.or_else(|| self.logger.clone()),
        }
    }
}

impl fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentContext")
            .field("model", &self.client.model())
            .field("memory", &self.memory.is_some())
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Per-call replacements for context capabilities.
#[derive(Clone, Default)]
pub struct ContextOverrides {
    pub client: Option<Arc<dyn LanguageModelClient>>,
    pub memory: Option<Arc<dyn AgentMemory>>,
    pub logger: Option<Arc<dyn AgentLogger>>,
}

impl ContextOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: Arc<dyn LanguageModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn memory(mut self, memory: Arc<dyn AgentMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn AgentLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.client.is_none() && self.memory.is_none() && self.logger.is_none()
    }
}
