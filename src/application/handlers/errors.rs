//! Service-level errors and their boundary codes.

use thiserror::Error;

use crate::application::agent::AgentError;
use crate::domain::agent::SchemaViolation;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::AIError;

/// Why a service request failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The wire request does not match the public request schema.
    #[error("invalid request: {}", join(.0))]
    InvalidRequest(Vec<SchemaViolation>),

    /// A typed request carried an out-of-range or empty value.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The assembled response does not match the public response schema.
    #[error("invalid response: {}", join(.0))]
    InvalidResponse(Vec<SchemaViolation>),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn join(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::InvalidInput(_) => ErrorCode::ValidationFailed,
            Self::Agent(AgentError::PromptBuild { .. }) => ErrorCode::ValidationFailed,
            Self::Agent(AgentError::Transport(AIError::RateLimited { .. })) => {
                ErrorCode::RateLimited
            }
            Self::Agent(AgentError::Transport(_)) => ErrorCode::AIProviderError,
            Self::Agent(AgentError::Extraction { .. } | AgentError::Validation { .. }) => {
                ErrorCode::InvalidModelOutput
            }
            Self::InvalidResponse(_) => ErrorCode::InvalidModelOutput,
            Self::Serialization(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to return to callers. Model output never leaks.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidRequest(violations) => violations
                .iter()
                .map(SchemaViolation::to_client_message)
                .collect::<Vec<_>>()
                .join("; "),
            Self::InvalidInput(err) => err.to_string(),
            Self::Agent(AgentError::PromptBuild { source, .. }) => source.to_string(),
            Self::Agent(AgentError::Transport(AIError::RateLimited { retry_after_secs })) => {
                format!("Too many requests, retry after {} seconds", retry_after_secs)
            }
            Self::Agent(AgentError::Transport(_)) => {
                "The language model is unavailable, please try again".to_string()
            }
            Self::Agent(_) | Self::InvalidResponse(_) => {
                "The language model returned an unusable response".to_string()
            }
            Self::Serialization(_) => "Internal error".to_string(),
        }
    }
}

impl From<ServiceError> for DomainError {
    fn from(err: ServiceError) -> Self {
        let mut domain = DomainError::new(err.code(), err.client_message());
        let fields: Vec<&str> = match &err {
            ServiceError::InvalidRequest(v) | ServiceError::InvalidResponse(v) => {
                v.iter().filter_map(SchemaViolation::field).collect()
            }
            ServiceError::Agent(agent) => {
                agent.violations().iter().filter_map(SchemaViolation::field).collect()
            }
            _ => Vec::new(),
        };
        if !fields.is_empty() {
            domain = domain.with_detail("fields", fields.join(","));
        }
        domain
    }
}
