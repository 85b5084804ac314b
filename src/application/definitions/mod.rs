//! Agent definitions - each binds a system prompt, prompt builder and
//! output schema to the shared [`AgentRuntime`](super::agent::AgentRuntime).

mod communication_mediator;
mod crisis_translator;
mod proactive_coach;
mod translation_planner;

pub use communication_mediator::CommunicationMediator;
pub use crisis_translator::CrisisTranslator;
pub use proactive_coach::ProactiveCoach;
pub use translation_planner::TranslationPlanner;

use crate::domain::foundation::ValidationError;

/// Rejects a blank message before any prompt is sent.
fn require_message(field: &str, message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}
