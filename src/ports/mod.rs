//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the agent pipeline and the outside world. Adapters implement these ports.
//!
//! - `LanguageModelClient` - single prompt-in, text-out model call
//! - `ProfileStore` - read-only profile lookup by id
//! - `AgentMemory` - optional key/value memory for agents
//! - `AgentLogger` - optional structured logging capability

mod agent_logger;
mod agent_memory;
mod language_model;
mod profile_store;

pub use agent_logger::AgentLogger;
pub use agent_memory::{AgentMemory, MemoryError};
pub use language_model::{AIError, InvokeOptions, LanguageModelClient, PromptPayload};
pub use profile_store::{ProfileStore, ProfileStoreError};
