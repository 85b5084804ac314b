//! Agent execution - context, hooks and the structured-output runtime.

mod context;
mod errors;
mod hooks;
mod runtime;

pub use context::{AgentContext, ContextOverrides};
pub use errors::AgentError;
pub use hooks::{InvocationInfo, LifecycleHooks, NoopHooks};
pub use runtime::{AgentRuntime, Invocation, StructuredAgent};
