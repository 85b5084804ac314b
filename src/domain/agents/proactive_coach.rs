//! Proactive coach - predicts rising stress from physiological and
//! contextual signals and suggests preventative steps.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::agent::prompt::{render_map, ContextMap, NONE_PROVIDED};
use crate::domain::agent::{FieldKind, OutputSchema};

pub const AGENT_NAME: &str = "proactive_coach";

pub const SYSTEM_PROMPT: &str = "You are a proactive wellbeing coach. From heart-rate \
variability readings, daily context and the user's own profile you estimate whether stress is \
building and suggest small, practical interventions before it peaks. Be honest about \
uncertainty, never alarm the user without reason, and never give medical advice.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingInput {
    #[serde(default)]
    pub hrv_data: ContextMap,
    #[serde(default)]
    pub contextual_data: ContextMap,
    #[serde(default)]
    pub user_profile: ContextMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_history: Option<Vec<ContextMap>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Moderate,
    High,
}

impl Urgency {
    pub const ALL: &'static [&'static str] = &["low", "moderate", "high"];
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressPrediction {
    pub predicted_stress_level: u8,
    pub confidence_level: String,
    pub time_to_potential_crisis: String,
    pub likely_triggers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreventativeCoaching {
    pub immediate_interventions: Vec<String>,
    pub short_term_strategies: Vec<String>,
    pub support_network_suggestions: Vec<String>,
    pub environmental_changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub urgency: Urgency,
    pub recommended_action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingOutput {
    pub stress_prediction: StressPrediction,
    pub preventative_coaching: PreventativeCoaching,
    pub notification: Notification,
}

pub static OUTPUT_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new(AGENT_NAME)
        .require("stressPrediction", FieldKind::Object)
        .require("stressPrediction.predictedStressLevel", FieldKind::integer(1, 10))
        .require("stressPrediction.confidenceLevel", FieldKind::text())
        .require("stressPrediction.timeToPotentialCrisis", FieldKind::text())
        .require("stressPrediction.likelyTriggers", FieldKind::string_list(0))
        .require("preventativeCoaching", FieldKind::Object)
        .require("preventativeCoaching.immediateInterventions", FieldKind::string_list(0))
        .require("preventativeCoaching.shortTermStrategies", FieldKind::string_list(0))
        .require("preventativeCoaching.supportNetworkSuggestions", FieldKind::string_list(0))
        .require("preventativeCoaching.environmentalChanges", FieldKind::string_list(0))
        .require("notification", FieldKind::Object)
        .require("notification.message", FieldKind::text())
        .require("notification.urgency", FieldKind::Enum(Urgency::ALL))
        .require("notification.recommendedAction", FieldKind::text())
});

fn render_history(history: Option<&[ContextMap]>) -> String {
    match history {
        Some(entries) if !entries.is_empty() => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let fields = render_map(entry).replace('\n', "; ");
                format!("{}. {}", i + 1, fields)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => NONE_PROVIDED.to_string(),
    }
}

pub fn build_prompt(input: &CoachingInput) -> String {
    format!(
        "HRV data:\n{}\n\n\
         Contextual data:\n{}\n\n\
         User profile:\n{}\n\n\
         Previous interventions:\n{}\n\n\
         Respond with a single JSON object of exactly this shape:\n\
         {{\n  \
         \"stressPrediction\": {{\n    \
         \"predictedStressLevel\": integer from 1 to 10,\n    \
         \"confidenceLevel\": string,\n    \
         \"timeToPotentialCrisis\": string,\n    \
         \"likelyTriggers\": [string]\n  \
         }},\n  \
         \"preventativeCoaching\": {{\n    \
         \"immediateInterventions\": [string],\n    \
         \"shortTermStrategies\": [string],\n    \
         \"supportNetworkSuggestions\": [string],\n    \
         \"environmentalChanges\": [string]\n  \
         }},\n  \
         \"notification\": {{\n    \
         \"message\": string,\n    \
         \"urgency\": \"low\" | \"moderate\" | \"high\",\n    \
         \"recommendedAction\": string\n  \
         }}\n\
         }}",
        render_map(&input.hrv_data),
        render_map(&input.contextual_data),
        render_map(&input.user_profile),
        render_history(input.intervention_history.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: Value) -> ContextMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn valid_output() -> Value {
        json!({
            "stressPrediction": {
                "predictedStressLevel": 7,
                "confidenceLevel": "medium",
                "timeToPotentialCrisis": "2 hours",
                "likelyTriggers": ["deadline"]
            },
            "preventativeCoaching": {
                "immediateInterventions": ["walk"],
                "shortTermStrategies": [],
                "supportNetworkSuggestions": ["text Jo"],
                "environmentalChanges": []
            },
            "notification": {
                "message": "Your stress looks like it is climbing.",
                "urgency": "moderate",
                "recommendedAction": "Take a 5 minute break"
            }
        })
    }

    #[test]
    fn renders_history_entries_numbered() {
        let input = CoachingInput {
            hrv_data: map(json!({"rmssd": 22})),
            contextual_data: ContextMap::new(),
            user_profile: ContextMap::new(),
            intervention_history: Some(vec![
                map(json!({"action": "breathing", "helped": true})),
                map(json!({"action": "walk"})),
            ]),
        };
        let prompt = build_prompt(&input);
        assert!(prompt.contains("HRV data:\nrmssd: 22"));
        assert!(prompt.contains("1. action: breathing; helped: true\n2. action: walk"));
        assert!(prompt.contains("Contextual data:\nNone provided"));
    }

    #[test]
    fn missing_history_is_none_provided() {
        let input = CoachingInput {
            hrv_data: ContextMap::new(),
            contextual_data: ContextMap::new(),
            user_profile: ContextMap::new(),
            intervention_history: None,
        };
        assert!(build_prompt(&input).contains("Previous interventions:\nNone provided"));
    }

    #[test]
    fn decodes_valid_output() {
        let output: CoachingOutput = OUTPUT_SCHEMA.decode(valid_output()).unwrap();
        assert_eq!(output.notification.urgency, Urgency::Moderate);
        assert_eq!(output.stress_prediction.predicted_stress_level, 7);
    }

    #[test]
    fn rejects_unknown_urgency() {
        let mut output = valid_output();
        output["notification"]["urgency"] = json!("critical");
        let errors = OUTPUT_SCHEMA.validate(&output).unwrap_err();
        assert_eq!(errors[0].field(), Some("notification.urgency"));
    }

    #[test]
    fn rejects_out_of_range_prediction() {
        let mut output = valid_output();
        output["stressPrediction"]["predictedStressLevel"] = json!(0);
        assert!(OUTPUT_SCHEMA.validate(&output).is_err());
    }

    #[test]
    fn reports_all_missing_sections() {
        let errors = OUTPUT_SCHEMA
            .validate(&json!({"notification": valid_output()["notification"].clone()}))
            .unwrap_err();
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field()).collect();
        assert_eq!(fields, vec!["stressPrediction", "preventativeCoaching"]);
    }
}
