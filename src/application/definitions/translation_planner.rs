use crate::application::agent::{AgentError, AgentRuntime, Invocation, StructuredAgent};
use crate::domain::agent::OutputSchema;
use crate::domain::agents::translation_plan::{
    self, PlanInput, TranslationPlan, OUTPUT_SCHEMA, SYSTEM_PROMPT,
};
use crate::domain::foundation::ValidationError;

use super::require_message;

/// Produces a step-by-step plan for getting a message across while
/// overwhelmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationPlanner {
    runtime: AgentRuntime,
}

impl TranslationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn plan(
        &self,
        input: &PlanInput,
        invocation: Invocation,
    ) -> Result<TranslationPlan, AgentError> {
        self.runtime.run(self, input, invocation).await
    }
}

impl StructuredAgent for TranslationPlanner {
    type Input = PlanInput;
    type Output = TranslationPlan;

    fn name(&self) -> &'static str {
        translation_plan::AGENT_NAME
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn build_prompt(&self, input: &PlanInput) -> Result<String, ValidationError> {
        require_message("rawMessage", &input.raw_message)?;
        Ok(translation_plan::build_prompt(input))
    }

    fn schema(&self) -> &OutputSchema {
        &OUTPUT_SCHEMA
    }
}
