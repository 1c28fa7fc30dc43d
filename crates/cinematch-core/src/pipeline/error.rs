use cinematch_llm::LlmError;
use cinematch_memory::VectorStoreError;

/// Failure of a single pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("failed to generate embedding")]
    EmbeddingUnavailable,

    #[error("embedding service error: {0}")]
    EmbeddingService(#[source] LlmError),

    #[error("retrieval service error: {0}")]
    RetrievalService(#[source] VectorStoreError),

    /// The generation service detail is logged where it happens and not kept here.
    #[error("failed to generate a conversational response")]
    GenerationFailed,
}

impl StageError {
    /// Transport-level failures of the embedding or search service may succeed
    /// on a later attempt. Nothing in this crate retries; the flag is for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EmbeddingService(e) => e.is_transient(),
            Self::RetrievalService(e) => e.is_transient(),
            Self::EmptyQuery | Self::EmbeddingUnavailable | Self::GenerationFailed => false,
        }
    }
}

/// Caller-facing pipeline failure. The message is fixed; the stage error is
/// only reachable through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Sorry, something went wrong. Please try again.")]
    Failed(#[source] StageError),
}

impl PipelineError {
    #[must_use]
    pub fn stage(&self) -> &StageError {
        match self {
            Self::Failed(e) => e,
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.stage().is_retryable()
    }
}
