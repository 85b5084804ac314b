//! Structured-output contract shared by every agent kind.

pub mod extractor;
pub mod prompt;
pub mod schema;

pub use extractor::OutputExtractor;
pub use prompt::{ContextMap, NONE_PROVIDED, UNSPECIFIED};
pub use schema::{FieldKind, FieldRule, OutputSchema, SchemaViolation};
