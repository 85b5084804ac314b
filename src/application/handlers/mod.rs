//! Application handlers.
//!
//! Service orchestrators: resolve personalization, run the agent, attach
//! response metadata and re-validate against the public wire schema.

mod errors;
mod mediate_message;
mod metadata;
mod translate_message;

pub use errors::ServiceError;
pub use mediate_message::{MediateMessageCommand, MediateMessageHandler, MediateMessageResult};
pub use metadata::ResponseMetadata;
pub use translate_message::{
    TranslateMessageCommand, TranslateMessageHandler, TranslateMessageResult,
};
