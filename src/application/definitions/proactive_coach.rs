use crate::application::agent::{AgentError, AgentRuntime, Invocation, StructuredAgent};
use crate::domain::agent::OutputSchema;
use crate::domain::agents::proactive_coach::{
    self, CoachingInput, CoachingOutput, OUTPUT_SCHEMA, SYSTEM_PROMPT,
};
use crate::domain::foundation::ValidationError;

/// Predicts rising stress from physiological signals and suggests
/// interventions before it peaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProactiveCoach {
    runtime: AgentRuntime,
}

impl ProactiveCoach {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn coach(
        &self,
        input: &CoachingInput,
        invocation: Invocation,
    ) -> Result<CoachingOutput, AgentError> {
        self.runtime.run(self, input, invocation).await
    }
}

impl StructuredAgent for ProactiveCoach {
    type Input = CoachingInput;
    type Output = CoachingOutput;

    fn name(&self) -> &'static str {
        proactive_coach::AGENT_NAME
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn build_prompt(&self, input: &CoachingInput) -> Result<String, ValidationError> {
        Ok(proactive_coach::build_prompt(input))
    }

    fn schema(&self) -> &OutputSchema {
        &OUTPUT_SCHEMA
    }
}
