use crate::application::agent::{AgentError, AgentRuntime, Invocation, StructuredAgent};
use crate::domain::agent::OutputSchema;
use crate::domain::agents::communication_mediator::{
    self, MediationInput, MediationOutput, OUTPUT_SCHEMA, SYSTEM_PROMPT,
};
use crate::domain::foundation::ValidationError;

use super::require_message;

/// Rephrases a message so it lands without escalating the conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommunicationMediator {
    runtime: AgentRuntime,
}

impl CommunicationMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mediate(
        &self,
        input: &MediationInput,
        invocation: Invocation,
    ) -> Result<MediationOutput, AgentError> {
        self.runtime.run(self, input, invocation).await
    }
}

impl StructuredAgent for CommunicationMediator {
    type Input = MediationInput;
    type Output = MediationOutput;

    fn name(&self) -> &'static str {
        communication_mediator::AGENT_NAME
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn build_prompt(&self, input: &MediationInput) -> Result<String, ValidationError> {
        require_message("rawMessage", &input.raw_message)?;
        Ok(communication_mediator::build_prompt(input))
    }

    fn schema(&self) -> &OutputSchema {
        &OUTPUT_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockLanguageModel;
    use crate::application::agent::AgentContext;
    use crate::domain::agent::SchemaViolation;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn response(escalation: Value, phrasings: Value) -> String {
        json!({
            "sentimentAnalysis": {
                "detectedEmotion": "hurt",
                "escalationLevel": escalation,
                "underlyingNeed": "to be included"
            },
            "rephrasedMessage": "I felt left out when the plans changed.",
            "keyChanges": ["dropped 'never'"],
            "toneShift": "accusing to honest",
            "timingSuggestion": "when you are both home",
            "alternativePhrasings": phrasings
        })
        .to_string()
    }

    async fn mediate(raw: String) -> Result<MediationOutput, AgentError> {
        let mock = MockLanguageModel::new().with_response(raw);
        CommunicationMediator::new()
            .mediate(
                &MediationInput::new("You never include me!"),
                Invocation::new(AgentContext::new(Arc::new(mock))),
            )
            .await
    }

    #[tokio::test]
    async fn valid_response_decodes() {
        let output = mediate(response(json!(7), json!(["Could we plan together?"])))
            .await
            .unwrap();

        assert_eq!(output.sentiment_analysis.escalation_level, 7);
        assert_eq!(output.alternative_phrasings.len(), 1);
    }

    #[tokio::test]
    async fn escalation_bounds_are_inclusive() {
        assert!(mediate(response(json!(1), json!(["a"]))).await.is_ok());
        assert!(mediate(response(json!(10), json!(["a"]))).await.is_ok());

        for out_of_range in [0, 11] {
            let err = mediate(response(json!(out_of_range), json!(["a"])))
                .await
                .unwrap_err();
            assert!(matches!(
                err.violations()[0],
                SchemaViolation::OutOfRange { .. }
            ));
        }
    }

    #[tokio::test]
    async fn at_least_one_alternative_phrasing_is_required() {
        let err = mediate(response(json!(5), json!([]))).await.unwrap_err();
        assert_eq!(
            err.violations()[0].field(),
            Some("alternativePhrasings")
        );
    }

    #[tokio::test]
    async fn history_is_rendered_in_order() {
        let mock = MockLanguageModel::new().with_response(response(json!(3), json!(["a"])));
        let input = MediationInput::new("Fine.")
            .with_history(vec!["Are you coming?".to_string(), "Maybe.".to_string()])
            .with_goal("repair");
        CommunicationMediator::new()
            .mediate(&input, Invocation::new(AgentContext::new(Arc::new(mock.clone()))))
            .await
            .unwrap();

        let prompt = mock.last_call().unwrap().payload.user_prompt;
        assert!(prompt.contains("1. Are you coming?\n2. Maybe."));
        assert!(prompt.contains("Communication goal: repair"));
    }
}
