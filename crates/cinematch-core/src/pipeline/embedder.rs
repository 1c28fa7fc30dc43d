use std::sync::Arc;

use cinematch_llm::{LlmError, LlmProvider};

use super::error::StageError;

/// Turns query text into an embedding vector using the provider's embedding model.
pub struct Embedder<P> {
    provider: Arc<P>,
}

impl<P: LlmProvider> Embedder<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// One embedding request, no retry.
    ///
    /// # Errors
    ///
    /// [`StageError::EmptyQuery`] for empty text, [`StageError::EmbeddingUnavailable`]
    /// when the service answers without a vector, [`StageError::EmbeddingService`]
    /// for any other provider failure.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, StageError> {
        if text.is_empty() {
            return Err(StageError::EmptyQuery);
        }

        match self.provider.embed(text).await {
            Ok(v) if v.is_empty() => {
                tracing::error!(provider = self.provider.name(), "embedding is empty");
                Err(StageError::EmbeddingUnavailable)
            }
            Ok(v) => {
                tracing::debug!(dimensions = v.len(), "query embedded");
                Ok(v)
            }
            Err(LlmError::EmptyResponse { provider }) => {
                tracing::error!(provider, "embedding service returned no data");
                Err(StageError::EmbeddingUnavailable)
            }
            Err(e) => {
                tracing::error!(provider = self.provider.name(), "embedding failed: {e}");
                Err(StageError::EmbeddingService(e))
            }
        }
    }
}
