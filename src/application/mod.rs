//! Application layer - agent runtime, agent definitions and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod agent;
pub mod definitions;
pub mod handlers;
mod personalization;

pub use agent::{
    AgentContext, AgentError, AgentRuntime, ContextOverrides, Invocation, InvocationInfo,
    LifecycleHooks, NoopHooks, StructuredAgent,
};
pub use definitions::{CommunicationMediator, CrisisTranslator, ProactiveCoach, TranslationPlanner};
pub use handlers::{
    MediateMessageCommand, MediateMessageHandler, MediateMessageResult, ResponseMetadata,
    ServiceError, TranslateMessageCommand, TranslateMessageHandler, TranslateMessageResult,
};
pub use personalization::PersonalizationResolver;
