//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Steadfast domain.

mod errors;
mod ids;
mod stress_level;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{InvocationId, ProfileId};
pub use stress_level::StressLevel;
