//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `profile` - Communication profiles and the personalization fragment
//! - `agent` - Structured-output contract (extraction, schemas, prompt helpers)
//! - `agents` - The agent kinds: prompts, typed inputs/outputs and schemas

pub mod agent;
pub mod agents;
pub mod foundation;
pub mod profile;
