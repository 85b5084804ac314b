//! Mock language model for testing.
//!
//! Replays queued responses in order, records every payload it receives
//! and can simulate latency or inject errors.
//!
//! # Example
//!
//! ```ignore
//! let model = MockLanguageModel::new()
//!     .with_response(r#"{"translatedMessage": "I need a minute."}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let text = model.invoke(payload, InvokeOptions::new()).await?;
//! assert_eq!(model.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, InvokeOptions, LanguageModelClient, PromptPayload};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(MockError),
}

/// Error kinds the mock can raise.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u64 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// A payload seen by the mock, with its options.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub payload: PromptPayload,
    pub options: InvokeOptions,
}

/// Mock language model. Clones share the queue and call history.
#[derive(Debug, Clone)]
pub struct MockLanguageModel {
    model: String,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks a mutex, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self {
            model: "mock-model-1".to_string(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful text response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Text(content.into()));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text("Mock response".to_string()))
    }
}

#[async_trait]
impl LanguageModelClient for MockLanguageModel {
    async fn invoke(
        &self,
        payload: PromptPayload,
        options: InvokeOptions,
    ) -> Result<String, AIError> {
        lock(&self.calls).push(RecordedCall { payload, options });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text(content) => Ok(content),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
