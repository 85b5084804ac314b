//! Communication mediator - rephrases a heated message before it is sent.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::agent::prompt::{or_unspecified, render_map, render_numbered, ContextMap};
use crate::domain::agent::{FieldKind, OutputSchema};

pub const AGENT_NAME: &str = "communication_mediator";

pub const SYSTEM_PROMPT: &str = "You are a communication mediator. You help people say what \
they need without escalating a conflict. Preserve the sender's underlying need and meaning, \
remove blame and absolutes, and suggest wording the recipient is likely to hear. Do not take \
sides and do not invent facts that are not in the message or its context.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationInput {
    pub raw_message: String,
    #[serde(default)]
    pub sender_context: ContextMap,
    #[serde(default)]
    pub recipient_context: ContextMap,
    /// Earlier messages, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_goal: Option<String>,
}

impl MediationInput {
    pub fn new(raw_message: impl Into<String>) -> Self {
        Self {
            raw_message: raw_message.into(),
            sender_context: ContextMap::new(),
            recipient_context: ContextMap::new(),
            conversation_history: Vec::new(),
            communication_goal: None,
        }
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.conversation_history = history;
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.communication_goal = Some(goal.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    pub detected_emotion: String,
    /// 1 (calm) to 10 (explosive).
    pub escalation_level: u8,
    pub underlying_need: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediationOutput {
    pub sentiment_analysis: SentimentAnalysis,
    pub rephrased_message: String,
    pub key_changes: Vec<String>,
    pub tone_shift: String,
    pub timing_suggestion: String,
    pub alternative_phrasings: Vec<String>,
}

pub static OUTPUT_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new(AGENT_NAME)
        .require("sentimentAnalysis", FieldKind::Object)
        .require("sentimentAnalysis.detectedEmotion", FieldKind::text())
        .require("sentimentAnalysis.escalationLevel", FieldKind::integer(1, 10))
        .require("sentimentAnalysis.underlyingNeed", FieldKind::text())
        .require("rephrasedMessage", FieldKind::text())
        .require("keyChanges", FieldKind::string_list(0))
        .require("toneShift", FieldKind::text())
        .require("timingSuggestion", FieldKind::text())
        .require("alternativePhrasings", FieldKind::string_list(1))
});

pub fn build_prompt(input: &MediationInput) -> String {
    format!(
        "Original message:\n{}\n\n\
         Sender context:\n{}\n\n\
         Recipient context:\n{}\n\n\
         Conversation history (oldest first):\n{}\n\n\
         Communication goal: {}\n\n\
         Respond with a single JSON object of exactly this shape:\n\
         {{\n  \
         \"sentimentAnalysis\": {{\n    \
         \"detectedEmotion\": string,\n    \
         \"escalationLevel\": integer from 1 to 10,\n    \
         \"underlyingNeed\": string\n  \
         }},\n  \
         \"rephrasedMessage\": string,\n  \
         \"keyChanges\": [string],\n  \
         \"toneShift\": string,\n  \
         \"timingSuggestion\": string,\n  \
         \"alternativePhrasings\": [string] (at least one)\n\
         }}",
        input.raw_message.trim(),
        render_map(&input.sender_context),
        render_map(&input.recipient_context),
        render_numbered(&input.conversation_history),
        or_unspecified(input.communication_goal.as_deref()),
    )
}
