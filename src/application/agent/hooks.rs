//! Lifecycle hooks scoped to a single agent invocation.
//!
//! Hooks observe; they cannot change the outcome. Every callback returns
//! `()`, so a failing invocation always surfaces its original error.

use async_trait::async_trait;
use serde_json::Value;

use super::AgentError;
use crate::domain::foundation::InvocationId;
use crate::ports::PromptPayload;

/// Identifies the invocation a hook is called for.
#[derive(Debug, Clone)]
pub struct InvocationInfo {
    pub id: InvocationId,
    pub agent: &'static str,
    pub model: String,
}

/// Callbacks around one agent invocation. All methods default to no-ops.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Called once the prompt is built, before the model is invoked.
    ///
    /// Skipped when the input cannot be rendered into a prompt; `on_error`
    /// then fires without a preceding `before_execute`.
    async fn before_execute(&self, _info: &InvocationInfo, _payload: &PromptPayload) {}

    /// Called with the final, validated output.
    async fn after_execute(&self, _info: &InvocationInfo, _output: &Value) {}

    /// Called when any stage fails.
    async fn on_error(&self, _info: &InvocationInfo, _error: &AgentError) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl LifecycleHooks for NoopHooks {}
