//! Communication profile and its value objects.
//!
//! Profiles are owned by the external profile store. The core only reads
//! them to render a personalization fragment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ProfileId, ValidationError};

/// Maximum number of contacts in a support circle.
pub const MAX_SUPPORT_CIRCLE: usize = 5;

/// How a support contact prefers to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Sms,
    Email,
    Call,
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Email => write!(f, "email"),
            Self::Call => write!(f, "call"),
        }
    }
}

/// A trusted person the user can reach out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportContact {
    pub name: String,
    pub relationship: String,
    pub contact_method: ContactMethod,
}

/// Tone the user wants guidance written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Soft,
    Direct,
    Informative,
}

impl Tone {
    /// Instruction appended to the system prompt for this tone.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Soft => "Use a soft, gentle and reassuring tone.",
            Self::Direct => "Use a direct, concise tone without hedging.",
            Self::Informative => {
                "Use an informative tone that briefly explains the reasoning behind each suggestion."
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft => write!(f, "soft"),
            Self::Direct => write!(f, "direct"),
            Self::Informative => write!(f, "informative"),
        }
    }
}

/// Phrasing preferences for generated guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationGuidelines {
    #[serde(default)]
    pub tone: Tone,
    /// Phrases that resonate with the user
    #[serde(default)]
    pub do_phrases: Vec<String>,
    /// Phrases the user finds unhelpful or triggering
    #[serde(default)]
    pub avoid_phrases: Vec<String>,
}

/// What tends to precede a crisis and what helps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CrisisSignals {
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub escalation_indicators: Vec<String>,
    #[serde(default)]
    pub self_regulation_techniques: Vec<String>,
}

/// A user's stored communication profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub preferred_name: String,
    #[serde(default)]
    pub support_circle: Vec<SupportContact>,
    #[serde(default)]
    pub communication_guidelines: CommunicationGuidelines,
    #[serde(default)]
    pub crisis_signals: CrisisSignals,
}

impl Profile {
    /// Creates a profile with default guidelines and no signals.
    pub fn new(id: ProfileId, preferred_name: impl Into<String>) -> Self {
        Self {
            id,
            preferred_name: preferred_name.into(),
            support_circle: Vec::new(),
            communication_guidelines: CommunicationGuidelines::default(),
            crisis_signals: CrisisSignals::default(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.communication_guidelines.tone = tone;
        self
    }

    pub fn with_do_phrases(mut self, phrases: Vec<String>) -> Self {
        self.communication_guidelines.do_phrases = phrases;
        self
    }

    pub fn with_avoid_phrases(mut self, phrases: Vec<String>) -> Self {
        self.communication_guidelines.avoid_phrases = phrases;
        self
    }

    pub fn with_triggers(mut self, triggers: Vec<String>) -> Self {
        self.crisis_signals.triggers = triggers;
        self
    }

    pub fn with_techniques(mut self, techniques: Vec<String>) -> Self {
        self.crisis_signals.self_regulation_techniques = techniques;
        self
    }

    pub fn with_contact(mut self, contact: SupportContact) -> Self {
        self.support_circle.push(contact);
        self
    }

    /// Checks the invariants a stored profile must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.preferred_name.trim().is_empty() {
            return Err(ValidationError::empty_field("preferredName"));
        }
        if self.support_circle.len() > MAX_SUPPORT_CIRCLE {
            return Err(ValidationError::too_many(
                "supportCircle",
                MAX_SUPPORT_CIRCLE,
                self.support_circle.len(),
            ));
        }
        for (i, contact) in self.support_circle.iter().enumerate() {
            if contact.name.trim().is_empty() {
                return Err(ValidationError::empty_field(format!(
                    "supportCircle[{}].name",
                    i
                )));
            }
        }
        Ok(())
    }
}
