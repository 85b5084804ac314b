use crate::application::agent::{AgentError, AgentRuntime, Invocation, StructuredAgent};
use crate::domain::agent::OutputSchema;
use crate::domain::agents::crisis_translator::{
    self, apply_safety_note, CrisisInput, CrisisOutput, OUTPUT_SCHEMA, SYSTEM_PROMPT,
};
use crate::domain::foundation::ValidationError;

use super::require_message;

/// Translates a distressed message into calm, structured guidance.
///
/// High-stress outputs always carry the crisis-resource note.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrisisTranslator {
    runtime: AgentRuntime,
}

impl CrisisTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn translate(
        &self,
        input: &CrisisInput,
        invocation: Invocation,
    ) -> Result<CrisisOutput, AgentError> {
        self.runtime.run(self, input, invocation).await
    }
}

impl StructuredAgent for CrisisTranslator {
    type Input = CrisisInput;
    type Output = CrisisOutput;

    fn name(&self) -> &'static str {
        crisis_translator::AGENT_NAME
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn build_prompt(&self, input: &CrisisInput) -> Result<String, ValidationError> {
        require_message("rawMessage", &input.raw_message)?;
        Ok(crisis_translator::build_prompt(input))
    }

    fn schema(&self) -> &OutputSchema {
        &OUTPUT_SCHEMA
    }

    fn post_process(&self, input: &CrisisInput, output: CrisisOutput) -> CrisisOutput {
        apply_safety_note(input.stress_level, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockLanguageModel;
    use crate::application::agent::AgentContext;
    use crate::domain::agents::CRISIS_RESOURCE_NOTE;
    use crate::domain::foundation::StressLevel;
    use std::sync::Arc;

    const FENCED: &str = "```json\n{\"translatedMessage\": \"I need a short break.\", \
        \"groundingTechnique\": \"5-4-3-2-1\"}\n```";

    fn invocation(mock: &MockLanguageModel) -> Invocation {
        Invocation::new(AgentContext::new(Arc::new(mock.clone())))
    }

    fn input(level: u8) -> CrisisInput {
        CrisisInput::new(StressLevel::new(level).unwrap(), "everything is too loud")
    }

    #[tokio::test]
    async fn high_stress_gets_safety_note() {
        let mock = MockLanguageModel::new().with_response(FENCED);
        let output = CrisisTranslator::new()
            .translate(&input(9), invocation(&mock))
            .await
            .unwrap();

        assert_eq!(output.translated_message, "I need a short break.");
        assert_eq!(output.safety_note.as_deref(), Some(CRISIS_RESOURCE_NOTE));
    }

    #[tokio::test]
    async fn low_stress_output_is_unchanged() {
        let mock = MockLanguageModel::new().with_response(FENCED);
        let output = CrisisTranslator::new()
            .translate(&input(3), invocation(&mock))
            .await
            .unwrap();

        assert_eq!(output.grounding_technique.as_deref(), Some("5-4-3-2-1"));
        assert!(output.safety_note.is_none());
    }

    #[tokio::test]
    async fn prompt_carries_stress_and_message() {
        let mock = MockLanguageModel::new().with_response(FENCED);
        CrisisTranslator::new()
            .translate(&input(7), invocation(&mock))
            .await
            .unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.payload.system_prompt, SYSTEM_PROMPT);
        assert!(call.payload.user_prompt.contains("Stress level: 7/10"));
        assert!(call.payload.user_prompt.contains("everything is too loud"));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_invoking() {
        let mock = MockLanguageModel::new();
        let input = CrisisInput::new(StressLevel::new(5).unwrap(), "  ");
        let err = CrisisTranslator::new()
            .translate(&input, invocation(&mock))
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::PromptBuild { .. }));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_translated_message_fails_validation() {
        let mock = MockLanguageModel::new().with_response(r#"{"safetyNote": "call someone"}"#);
        let err = CrisisTranslator::new()
            .translate(&input(9), invocation(&mock))
            .await
            .unwrap_err();

        assert_eq!(err.violations()[0].field(), Some("translatedMessage"));
    }
}
