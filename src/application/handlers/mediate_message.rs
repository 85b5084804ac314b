//! MediateMessage - rephrases a heated message with optional personalization.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{ResponseMetadata, ServiceError};
use crate::application::agent::{AgentContext, Invocation};
use crate::application::definitions::CommunicationMediator;
use crate::application::PersonalizationResolver;
use crate::domain::agents::communication_mediator::OUTPUT_SCHEMA;
use crate::domain::agents::{MediationInput, MediationOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediateMessageCommand {
    #[serde(flatten)]
    pub input: MediationInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediateMessageResult {
    #[serde(flatten)]
    pub output: MediationOutput,
    pub metadata: ResponseMetadata,
}

/// Handler for mediation requests.
pub struct MediateMessageHandler {
    context: AgentContext,
    resolver: PersonalizationResolver,
    mediator: CommunicationMediator,
}

impl MediateMessageHandler {
    pub fn new(context: AgentContext, resolver: PersonalizationResolver) -> Self {
        Self {
            context,
            resolver,
            mediator: CommunicationMediator::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: MediateMessageCommand,
    ) -> Result<MediateMessageResult, ServiceError> {
        let started = Instant::now();

        let fragment = self.resolver.resolve(cmd.profile_id.as_deref()).await;
        let output = self
            .mediator
            .mediate(
                &cmd.input,
                Invocation::new(self.context.clone()).with_personalization(fragment),
            )
            .await?;

        let result = MediateMessageResult {
            output,
            metadata: ResponseMetadata {
                model: self.context.client().model().to_string(),
                latency_ms: started.elapsed().as_millis() as u64,
            },
        };

        let wire = serde_json::to_value(&result)?;
        OUTPUT_SCHEMA
            .validate(&wire)
            .map_err(ServiceError::InvalidResponse)?;

        Ok(result)
    }
}
