//! Agent execution errors.

use thiserror::Error;

use crate::domain::agent::SchemaViolation;
use crate::domain::foundation::ValidationError;
use crate::ports::AIError;

/// Why an agent invocation failed.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The input could not be rendered into a prompt.
    #[error("{agent}: cannot build prompt: {source}")]
    PromptBuild {
        agent: &'static str,
        #[source]
        source: ValidationError,
    },

    /// The language model call itself failed.
    #[error(transparent)]
    Transport(#[from] AIError),

    /// The model output held nothing that parses as JSON.
    #[error("{agent}: model output is not valid JSON: {reason}")]
    Extraction { agent: &'static str, reason: String },

    /// The JSON parsed but violates the agent's output schema.
    #[error("{agent}: model output failed validation: {}", describe(.violations))]
    Validation {
        agent: &'static str,
        violations: Vec<SchemaViolation>,
    },
}

fn describe(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AgentError {
    /// Short machine-readable tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PromptBuild { .. } => "prompt_build",
            Self::Transport(_) => "transport",
            Self::Extraction { .. } => "extraction",
            Self::Validation { .. } => "validation",
        }
    }

    /// Violated fields, empty unless this is a validation failure.
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}
