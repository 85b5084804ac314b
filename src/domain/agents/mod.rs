//! Agent kinds - system prompt, typed input/output, prompt builder and
//! output schema for each use case.

pub mod communication_mediator;
pub mod crisis_translator;
pub mod proactive_coach;
pub mod translation_plan;

pub use communication_mediator::{MediationInput, MediationOutput, SentimentAnalysis};
pub use crisis_translator::{apply_safety_note, CrisisInput, CrisisOutput, CRISIS_RESOURCE_NOTE};
pub use proactive_coach::{
    CoachingInput, CoachingOutput, Notification, PreventativeCoaching, StressPrediction, Urgency,
};
pub use translation_plan::{PlanInput, PlanStep, TranslationPlan};
