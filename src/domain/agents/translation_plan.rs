//! Translation planner - a step-by-step plan for getting a message across
//! while under stress. This is the shape returned by the translate service.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::agent::{FieldKind, FieldRule, OutputSchema};
use crate::domain::foundation::StressLevel;

pub const AGENT_NAME: &str = "translation_planner";

pub const SYSTEM_PROMPT: &str = "You help people who are overwhelmed communicate what they \
need. Given a raw message and how stressed the sender feels, pick the least demanding way to \
communicate, a grounding technique to use first, and a short sequence of concrete steps. Each \
step carries a calm rephrasing of the message the user can send as-is. Keep every step small \
enough to do while distressed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub stress_level: StressLevel,
    pub raw_message: String,
}

impl PlanInput {
    pub fn new(stress_level: StressLevel, raw_message: impl Into<String>) -> Self {
        Self {
            stress_level,
            raw_message: raw_message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_number: u32,
    pub title: String,
    pub icon_suggestion: String,
    pub rephrased_message: String,
    pub pro_tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPlan {
    pub communication_medium: String,
    pub grounding_technique: String,
    pub steps: Vec<PlanStep>,
}

fn step_rules() -> Vec<FieldRule> {
    let text = |path| FieldRule {
        path,
        kind: FieldKind::text(),
        required: true,
    };
    vec![
        FieldRule {
            path: "step_number",
            kind: FieldKind::integer(1, i64::from(u32::MAX)),
            required: true,
        },
        text("title"),
        text("icon_suggestion"),
        text("rephrased_message"),
        text("pro_tip"),
    ]
}

pub static OUTPUT_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new(AGENT_NAME)
        .require("communication_medium", FieldKind::text())
        .require("grounding_technique", FieldKind::text())
        .require(
            "steps",
            FieldKind::ObjectList {
                min_items: 1,
                fields: step_rules(),
            },
        )
});

/// Schema of the public translate response, plan plus metadata envelope.
pub static WIRE_RESPONSE_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new("translate_response")
        .require("communication_medium", FieldKind::text())
        .require("grounding_technique", FieldKind::text())
        .require(
            "steps",
            FieldKind::ObjectList {
                min_items: 1,
                fields: step_rules(),
            },
        )
        .optional("metadata", FieldKind::Object)
        .optional("metadata.model", FieldKind::any_text())
        .optional("metadata.latencyMs", FieldKind::integer(0, i64::MAX))
});

pub fn build_prompt(input: &PlanInput) -> String {
    format!(
        "Stress level: {}\n\
         Message the user wants to get across:\n{}\n\n\
         Respond with a single JSON object of exactly this shape:\n\
         {{\n  \
         \"communication_medium\": string,\n  \
         \"grounding_technique\": string,\n  \
         \"steps\": [\n    \
         {{\n      \
         \"step_number\": integer starting at 1,\n      \
         \"title\": string,\n      \
         \"icon_suggestion\": string,\n      \
         \"rephrased_message\": string,\n      \
         \"pro_tip\": string\n    \
         }}\n  \
         ] (at least one step)\n\
         }}",
        input.stress_level,
        input.raw_message.trim(),
    )
}
