//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the agent pipeline to external systems:
//! - `ai` - Language model clients (Anthropic, OpenAI, mock) and model routing
//! - `profile` - Profile stores (YAML files, in-memory)
//! - `memory` - Agent memory (in-memory)
//! - `logging` - Agent loggers (tracing, recording)

pub mod ai;
pub mod logging;
pub mod memory;
pub mod profile;

pub use ai::{MockLanguageModel, ModelRouter};
pub use logging::{RecordingLogger, TracingLogger};
pub use memory::InMemoryAgentMemory;
pub use profile::{FsProfileStore, InMemoryProfileStore};
