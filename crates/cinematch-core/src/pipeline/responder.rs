use std::sync::Arc;

use cinematch_llm::LlmProvider;

use super::error::StageError;
use crate::transcript::Transcript;

pub struct Responder<P> {
    provider: Arc<P>,
}

impl<P: LlmProvider> Responder<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Ask the model to answer `question` from `context`.
    ///
    /// Appends the user turn before the call and the assistant turn after it;
    /// on failure only the user turn has been added.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::GenerationFailed`] on any provider failure.
    pub async fn respond(
        &self,
        transcript: &mut Transcript,
        context: &str,
        question: &str,
    ) -> Result<String, StageError> {
        transcript.push_user(format!("Context: {context} Question: {question}"));

        let answer = self
            .provider
            .chat(transcript.messages())
            .await
            .map_err(|e| {
                tracing::error!(provider = self.provider.name(), "chat completion failed: {e}");
                StageError::GenerationFailed
            })?;

        transcript.push_assistant(answer.clone());
        tracing::debug!(chars = answer.len(), "chat response received");
        Ok(answer)
    }
}
