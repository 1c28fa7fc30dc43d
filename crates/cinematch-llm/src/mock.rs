//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    chat_calls: Arc<Mutex<Vec<Vec<Message>>>>,
    embed_calls: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            chat_calls: Arc::new(Mutex::new(Vec::new())),
            embed_calls: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 1536],
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_failing_embed(mut self) -> Self {
        self.fail_embed = true;
        self
    }

    /// Histories passed to every `chat` call, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn chat_calls(&self) -> Vec<Vec<Message>> {
        self.chat_calls.lock().unwrap().clone()
    }

    /// Texts passed to every `embed` call, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn embed_calls(&self) -> Vec<String> {
        self.embed_calls.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_calls.lock().unwrap().push(text.to_owned());
        if self.fail_embed {
            return Err(LlmError::Other("mock embedding error".into()));
        }
        if self.embedding.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "mock" });
        }
        Ok(self.embedding.clone())
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.chat_calls.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
