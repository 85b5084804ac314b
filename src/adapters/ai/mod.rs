//! Language model adapters.
//!
//! Implementations of the LanguageModelClient port.
//!
//! ## Available Adapters
//!
//! - `MockLanguageModel` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models (gpt-*, o1/o3/o4)
//! - `AnthropicProvider` - Anthropic Claude models
//! - `ModelRouter` - Picks one of the above from the model name

mod anthropic_provider;
mod mock_provider;
mod model_router;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockError, MockLanguageModel, MockResponse, RecordedCall};
pub use model_router::ModelRouter;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
