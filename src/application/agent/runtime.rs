//! Agent runtime - the prompt → model → extract → validate pipeline.
//!
//! Every agent is a [`StructuredAgent`]: a system prompt, a prompt builder
//! and an output schema. The runtime drives one invocation of it:
//!
//! 1. Merge per-call overrides into the context
//! 2. Build the prompt, then fire `before_execute`
//! 3. Invoke the model exactly once
//! 4. Extract and parse the JSON candidate
//! 5. Validate against the schema and decode
//! 6. Post-process, fire `after_execute` (or `on_error`) and log once

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::{AgentContext, AgentError, ContextOverrides, InvocationInfo, LifecycleHooks};
use crate::domain::agent::{OutputExtractor, OutputSchema};
use crate::domain::foundation::{InvocationId, ValidationError};
use crate::domain::profile::{personalize, PersonalizationFragment};
use crate::ports::{InvokeOptions, PromptPayload};

/// An agent that turns typed input into schema-validated typed output.
pub trait StructuredAgent: Send + Sync {
    type Input: Send + Sync;
    type Output: DeserializeOwned + Serialize + Send;

    /// Stable name used in logs, metadata and errors.
    fn name(&self) -> &'static str;

    /// Base system prompt, before personalization.
    fn system_prompt(&self) -> &str;

    /// Renders the user prompt, rejecting input that cannot be rendered.
    fn build_prompt(&self, input: &Self::Input) -> Result<String, ValidationError>;

    fn schema(&self) -> &OutputSchema;

    /// Adjusts validated output before it is returned.
    fn post_process(&self, _input: &Self::Input, output: Self::Output) -> Self::Output {
        output
    }
}

/// Per-call settings for one agent invocation.
#[derive(Clone)]
pub struct Invocation {
    context: AgentContext,
    overrides: ContextOverrides,
    hooks: Option<Arc<dyn LifecycleHooks>>,
    personalization: Option<PersonalizationFragment>,
    options: InvokeOptions,
}

impl Invocation {
    pub fn new(context: AgentContext) -> Self {
        Self {
            context,
            overrides: ContextOverrides::default(),
            hooks: None,
            personalization: None,
            options: InvokeOptions::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: ContextOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Appends the fragment to the agent's system prompt for this call only.
    pub fn with_personalization(mut self, fragment: Option<PersonalizationFragment>) -> Self {
        self.personalization = fragment;
        self
    }

    /// Extra metadata forwarded to the model client.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.with_metadata(key, value);
        self
    }
}

/// Executes [`StructuredAgent`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentRuntime {
    extractor: OutputExtractor,
}

impl AgentRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one invocation of `agent`.
    ///
    /// Hooks and logging observe the outcome but never replace it: on
    /// failure the original [`AgentError`] is returned.
    pub async fn run<A: StructuredAgent>(
        &self,
        agent: &A,
        input: &A::Input,
        invocation: Invocation,
    ) -> Result<A::Output, AgentError> {
        let Invocation {
            context,
            overrides,
            hooks,
            personalization,
            options,
        } = invocation;

        let context = context.merge(overrides);
        let info = InvocationInfo {
            id: InvocationId::new(),
            agent: agent.name(),
            model: context.client().model().to_string(),
        };
        let started = Instant::now();

        let outcome = self
            .execute(
                agent,
                input,
                &context,
                &info,
                hooks.as_deref(),
                personalization.as_ref(),
                options,
            )
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((output, value)) => {
                if let Some(hooks) = hooks.as_deref() {
                    hooks.after_execute(&info, &value).await;
                }
                log_success(&context, &info, latency_ms);
                Ok(output)
            }
            Err(error) => {
                if let Some(hooks) = hooks.as_deref() {
                    hooks.on_error(&info, &error).await;
                }
                log_failure(&context, &info, latency_ms, &error);
                Err(error)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute<A: StructuredAgent>(
        &self,
        agent: &A,
        input: &A::Input,
        context: &AgentContext,
        info: &InvocationInfo,
        hooks: Option<&dyn LifecycleHooks>,
        personalization: Option<&PersonalizationFragment>,
        options: InvokeOptions,
    ) -> Result<(A::Output, Value), AgentError> {
        let user_prompt = agent
            .build_prompt(input)
            .map_err(|source| AgentError::PromptBuild {
                agent: agent.name(),
                source,
            })?;
        let payload = PromptPayload::new(
            personalize(agent.system_prompt(), personalization),
            user_prompt,
        );

        if let Some(hooks) = hooks {
            hooks.before_execute(info, &payload).await;
        }

        let options = options
            .with_metadata("agent", agent.name())
            .with_metadata("invocationId", info.id.to_string());
        let raw = context.client().invoke(payload, options).await?;

        let candidate = self.extractor.extract(&raw);
        let parsed: Value =
            serde_json::from_str(&candidate).map_err(|e| AgentError::Extraction {
                agent: agent.name(),
                reason: e.to_string(),
            })?;

        let output: A::Output =
            agent
                .schema()
                .decode(parsed)
                .map_err(|violations| AgentError::Validation {
                    agent: agent.name(),
                    violations,
                })?;
        let output = agent.post_process(input, output);

        let value = hook_snapshot(info, &output);
        Ok((output, value))
    }
}

/// JSON view of the output handed to `after_execute`.
///
/// A serialization failure does not fail the invocation; it is logged and
/// hooks receive `null`.
fn hook_snapshot<T: Serialize>(info: &InvocationInfo, output: &T) -> Value {
    serde_json::to_value(output).unwrap_or_else(|err| {
        tracing::warn!(
            agent = info.agent,
            invocation_id = %info.id,
            error = %err,
            "output could not be serialized for hooks"
        );
        Value::Null
    })
}

fn log_success(context: &AgentContext, info: &InvocationInfo, latency_ms: u64) {
    let meta = json!({
        "agent": info.agent,
        "invocationId": info.id.to_string(),
        "model": info.model,
        "latencyMs": latency_ms,
    });
    match context.logger() {
        Some(logger) => logger.info("agent invocation succeeded", &meta),
        None => tracing::info!(
            agent = info.agent,
            invocation_id = %info.id,
            model = %info.model,
            latency_ms,
            "agent invocation succeeded"
        ),
    }
}

fn log_failure(context: &AgentContext, info: &InvocationInfo, latency_ms: u64, error: &AgentError) {
    let fields: Vec<&str> = error
        .violations()
        .iter()
        .filter_map(|v| v.field())
        .collect();
    let meta = json!({
        "agent": info.agent,
        "invocationId": info.id.to_string(),
        "model": info.model,
        "latencyMs": latency_ms,
        "kind": error.kind(),
        "error": error.to_string(),
        "fields": fields,
    });
    match context.logger() {
        Some(logger) => logger.error("agent invocation failed", &meta),
        None => tracing::error!(
            agent = info.agent,
            invocation_id = %info.id,
            model = %info.model,
            latency_ms,
            kind = error.kind(),
            error = %error,
            "agent invocation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockError;
    use crate::adapters::logging::LogLevel;
    use crate::adapters::{MockLanguageModel, RecordingLogger};
    use crate::domain::agent::FieldKind;
    use crate::domain::foundation::ProfileId;
    use crate::domain::profile::{Profile, Tone};
    use crate::ports::AIError;
    use async_trait::async_trait;
    use once_cell::sync::Lazy;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Echo {
        reply: String,
    }

    static ECHO_SCHEMA: Lazy<OutputSchema> =
        Lazy::new(|| OutputSchema::new("echo").require("reply", FieldKind::text()));

    struct EchoAgent;

    impl StructuredAgent for EchoAgent {
        type Input = String;
        type Output = Echo;

        fn name(&self) -> &'static str {
            "echo"
        }

        fn system_prompt(&self) -> &str {
            "You echo."
        }

        fn build_prompt(&self, input: &String) -> Result<String, ValidationError> {
            if input.trim().is_empty() {
                return Err(ValidationError::empty_field("message"));
            }
            Ok(format!("Echo: {input}"))
        }

        fn schema(&self) -> &OutputSchema {
            &ECHO_SCHEMA
        }

        fn post_process(&self, _input: &String, mut output: Echo) -> Echo {
            output.reply = output.reply.to_uppercase();
            output
        }
    }

    #[derive(Default)]
    struct TraceHook {
        events: Mutex<Vec<String>>,
    }

    impl TraceHook {
        fn events(&self) -> Vec<String> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }

        fn push(&self, event: String) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }

    #[async_trait]
    impl LifecycleHooks for TraceHook {
        async fn before_execute(&self, info: &InvocationInfo, _payload: &PromptPayload) {
            self.push(format!("before:{}", info.agent));
        }

        async fn after_execute(&self, _info: &InvocationInfo, output: &Value) {
            self.push(format!("after:{}", output["reply"].as_str().unwrap_or_default()));
        }

        async fn on_error(&self, _info: &InvocationInfo, error: &AgentError) {
            self.push(format!("error:{}", error.kind()));
        }
    }

    fn setup(mock: MockLanguageModel) -> (AgentContext, RecordingLogger) {
        let logger = RecordingLogger::new();
        let context = AgentContext::new(Arc::new(mock)).with_logger(Arc::new(logger.clone()));
        (context, logger)
    }

    #[tokio::test]
    async fn fenced_output_is_extracted_validated_and_post_processed() {
        let mock = MockLanguageModel::new().with_response("Sure!\n```json\n{\"reply\": \"hi\"}\n```");
        let (context, logger) = setup(mock.clone());

        let output = AgentRuntime::new()
            .run(&EchoAgent, &"hi".to_string(), Invocation::new(context))
            .await
            .unwrap();

        assert_eq!(output.reply, "HI");
        assert_eq!(mock.call_count(), 1);
        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[0].meta["agent"], "echo");
    }

    #[tokio::test]
    async fn call_metadata_names_agent_and_invocation() {
        let mock = MockLanguageModel::new().with_response(r#"{"reply": "ok"}"#);
        let (context, _) = setup(mock.clone());

        AgentRuntime::new()
            .run(
                &EchoAgent,
                &"x".to_string(),
                Invocation::new(context).with_metadata("requestId", "r-1"),
            )
            .await
            .unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.options.metadata["agent"], "echo");
        assert_eq!(call.options.metadata["requestId"], "r-1");
        assert!(call.options.metadata.contains_key("invocationId"));
        assert_eq!(call.payload.system_prompt, "You echo.");
        assert_eq!(call.payload.user_prompt, "Echo: x");
    }

    #[tokio::test]
    async fn personalization_extends_system_prompt_for_one_call() {
        let mock = MockLanguageModel::new()
            .with_response(r#"{"reply": "a"}"#)
            .with_response(r#"{"reply": "b"}"#);
        let (context, _) = setup(mock.clone());
        let profile = Profile::new(ProfileId::new(), "Sam").with_tone(Tone::Soft);
        let fragment = PersonalizationFragment::render(&profile);
        let runtime = AgentRuntime::new();

        runtime
            .run(
                &EchoAgent,
                &"x".to_string(),
                Invocation::new(context.clone()).with_personalization(Some(fragment)),
            )
            .await
            .unwrap();
        runtime
            .run(&EchoAgent, &"y".to_string(), Invocation::new(context))
            .await
            .unwrap();

        let calls = mock.calls();
        assert!(calls[0].payload.system_prompt.starts_with("You echo."));
        assert!(calls[0].payload.system_prompt.contains("Sam"));
        assert_eq!(calls[1].payload.system_prompt, "You echo.");
    }

    #[tokio::test]
    async fn prompt_build_failure_skips_the_model() {
        let mock = MockLanguageModel::new();
        let (context, logger) = setup(mock.clone());
        let hook = Arc::new(TraceHook::default());

        let err = AgentRuntime::new()
            .run(
                &EchoAgent,
                &"   ".to_string(),
                Invocation::new(context).with_hooks(hook.clone()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::PromptBuild { agent: "echo", .. }));
        assert_eq!(mock.call_count(), 0);
        assert_eq!(hook.events(), vec!["error:prompt_build"]);
        assert_eq!(logger.at_level(LogLevel::Error).len(), 1);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn hook_snapshot_falls_back_to_null() {
        let info = InvocationInfo {
            id: InvocationId::new(),
            agent: "echo",
            model: "mock".to_string(),
        };

        assert_eq!(hook_snapshot(&info, &Unserializable), Value::Null);
        assert_eq!(
            hook_snapshot(&info, &Echo { reply: "hi".to_string() }),
            json!({"reply": "hi"})
        );
    }

    #[tokio::test]
    async fn transport_error_propagates_unchanged() {
        let mock = MockLanguageModel::new().with_error(MockError::RateLimited {
            retry_after_secs: 12,
        });
        let (context, _) = setup(mock);

        let err = AgentRuntime::new()
            .run(&EchoAgent, &"x".to_string(), Invocation::new(context))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AgentError::Transport(AIError::RateLimited {
                retry_after_secs: 12
            })
        ));
    }

    #[tokio::test]
    async fn non_json_output_is_an_extraction_error() {
        let mock = MockLanguageModel::new().with_response("I cannot help with that.");
        let (context, _) = setup(mock);

        let err = AgentRuntime::new()
            .run(&EchoAgent, &"x".to_string(), Invocation::new(context))
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Extraction { agent: "echo", .. }));
    }

    #[tokio::test]
    async fn schema_violation_is_a_validation_error_and_hooks_see_it() {
        let mock = MockLanguageModel::new().with_response(r#"{"reply": ""}"#);
        let (context, logger) = setup(mock);
        let hook = Arc::new(TraceHook::default());

        let err = AgentRuntime::new()
            .run(
                &EchoAgent,
                &"x".to_string(),
                Invocation::new(context).with_hooks(hook.clone()),
            )
            .await
            .unwrap_err();

        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field(), Some("reply"));
        assert_eq!(hook.events(), vec!["before:echo", "error:validation"]);

        let errors = logger.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].meta["kind"], "validation");
        assert_eq!(errors[0].meta["fields"], json!(["reply"]));
    }

    #[tokio::test]
    async fn after_hook_sees_post_processed_output() {
        let mock = MockLanguageModel::new().with_response(r#"{"reply": "done"}"#);
        let (context, _) = setup(mock);
        let hook = Arc::new(TraceHook::default());

        AgentRuntime::new()
            .run(
                &EchoAgent,
                &"x".to_string(),
                Invocation::new(context).with_hooks(hook.clone()),
            )
            .await
            .unwrap();

        assert_eq!(hook.events(), vec!["before:echo", "after:DONE"]);
    }

    #[tokio::test]
    async fn override_client_replaces_context_client() {
        let base = MockLanguageModel::new();
        let replacement = MockLanguageModel::new()
            .with_model("replacement")
            .with_response(r#"{"reply": "r"}"#);
        let (context, logger) = setup(base.clone());

        AgentRuntime::new()
            .run(
                &EchoAgent,
                &"x".to_string(),
                Invocation::new(context)
                    .with_overrides(ContextOverrides::new().client(Arc::new(replacement.clone()))),
            )
            .await
            .unwrap();

        assert_eq!(base.call_count(), 0);
        assert_eq!(replacement.call_count(), 1);
        assert_eq!(logger.entries()[0].meta["model"], "replacement");
    }
}
