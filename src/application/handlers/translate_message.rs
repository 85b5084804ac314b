//! TranslateMessage - turns a raw message into a step-by-step plan.

use std::time::Instant;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ResponseMetadata, ServiceError};
use crate::application::agent::{AgentContext, Invocation};
use crate::application::definitions::TranslationPlanner;
use crate::application::PersonalizationResolver;
use crate::domain::agent::{FieldKind, OutputSchema};
use crate::domain::agents::translation_plan::WIRE_RESPONSE_SCHEMA;
use crate::domain::agents::{PlanInput, TranslationPlan};
use crate::domain::foundation::StressLevel;

static REQUEST_SCHEMA: Lazy<OutputSchema> = Lazy::new(|| {
    OutputSchema::new("translate_request")
        .require("rawMessage", FieldKind::text())
        .require(
            "stressLevel",
            FieldKind::integer(
                i64::from(StressLevel::WIRE_MIN),
                i64::from(StressLevel::WIRE_MAX),
            ),
        )
        .optional("profileId", FieldKind::any_text())
});

/// Translate request. `stress_level` is on the 1-5 wire scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateMessageCommand {
    pub raw_message: String,
    pub stress_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl TranslateMessageCommand {
    /// Validates and decodes a JSON request body.
    pub fn from_wire(body: Value) -> Result<Self, ServiceError> {
        REQUEST_SCHEMA.decode(body).map_err(ServiceError::InvalidRequest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateMessageResult {
    #[serde(flatten)]
    pub plan: TranslationPlan,
    pub metadata: ResponseMetadata,
}

/// Handler for translate requests.
pub struct TranslateMessageHandler {
    context: AgentContext,
    resolver: PersonalizationResolver,
    planner: TranslationPlanner,
}

impl TranslateMessageHandler {
    pub fn new(context: AgentContext, resolver: PersonalizationResolver) -> Self {
        Self {
            context,
            resolver,
            planner: TranslationPlanner::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: TranslateMessageCommand,
    ) -> Result<TranslateMessageResult, ServiceError> {
        let stress_level = StressLevel::from_wire_scale(cmd.stress_level)?;
        let started = Instant::now();

        let fragment = self.resolver.resolve(cmd.profile_id.as_deref()).await;
        let input = PlanInput::new(stress_level, cmd.raw_message);
        let plan = self
            .planner
            .plan(
                &input,
                Invocation::new(self.context.clone()).with_personalization(fragment),
            )
            .await?;

        let result = TranslateMessageResult {
            plan,
            metadata: ResponseMetadata {
                model: self.context.client().model().to_string(),
                latency_ms: started.elapsed().as_millis() as u64,
            },
        };

        let wire = serde_json::to_value(&result)?;
        WIRE_RESPONSE_SCHEMA
            .validate(&wire)
            .map_err(ServiceError::InvalidResponse)?;

        Ok(result)
    }
}
