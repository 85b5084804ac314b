//! Crisis translator - turns a distressed message into calm guidance.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::agent::prompt::{render_map, ContextMap};
use crate::domain::agent::{FieldKind, OutputSchema};
use crate::domain::foundation::StressLevel;

pub const AGENT_NAME: &str = "crisis_translator";

pub const SYSTEM_PROMPT: &str = "You are a calm, compassionate crisis communication assistant. \
You help people who are overwhelmed put what they are feeling into words that others can \
understand and act on. Never minimize the user's experience, never diagnose, and never give \
medical advice. Keep language short, concrete and kind. If the message suggests the user may \
be in danger, encourage them to contact emergency services or a crisis line.";

/// Fixed crisis-resource sentence injected for high stress levels.
pub const CRISIS_RESOURCE_NOTE: &str = "If you are in immediate danger or thinking about \
harming yourself, call or text 988 (Suicide & Crisis Lifeline, US) or contact your local \
emergency services right now.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisInput {
    pub stress_level: StressLevel,
    pub raw_message: String,
    #[serde(default)]
    pub profile_context: ContextMap,
}

impl CrisisInput {
    pub fn new(stress_level: StressLevel, raw_message: impl Into<String>) -> Self {
        Self {
            stress_level,
            raw_message: raw_message.into(),
            profile_context: ContextMap::new(),
        }
    }

    pub fn with_profile_context(mut self, context: ContextMap) -> Self {
        self.profile_context = context;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisOutput {
    pub translated_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_technique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_note: Option<String>,
}

pub static OUTPUT_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new(AGENT_NAME)
        .require("translatedMessage", FieldKind::text())
        .optional("communicationMedium", FieldKind::any_text())
        .optional("groundingTechnique", FieldKind::any_text())
        .optional("followUpSuggestion", FieldKind::any_text())
        .optional("safetyNote", FieldKind::any_text())
});

pub fn build_prompt(input: &CrisisInput) -> String {
    format!(
        "Stress level: {}\n\
         Message from the user:\n{}\n\n\
         Profile context:\n{}\n\n\
         Respond with strict JSON only. Do not wrap the response in markdown code fences \
         and do not add any text before or after the JSON object. Use exactly this shape:\n\
         {{\n  \
         \"translatedMessage\": string,\n  \
         \"communicationMedium\": string (optional),\n  \
         \"groundingTechnique\": string (optional),\n  \
         \"followUpSuggestion\": string (optional),\n  \
         \"safetyNote\": string (optional)\n\
         }}",
        input.stress_level,
        input.raw_message.trim(),
        render_map(&input.profile_context),
    )
}

/// Adds the crisis-resource note to a validated output when stress is high.
///
/// An existing non-blank note is left untouched.
pub fn apply_safety_note(stress_level: StressLevel, mut output: CrisisOutput) -> CrisisOutput {
    let has_note = output
        .safety_note
        .as_deref()
        .is_some_and(|note| !note.trim().is_empty());

    if stress_level.requires_safety_note() && !has_note {
        output.safety_note = Some(CRISIS_RESOURCE_NOTE.to_string());
    }
    output
}
