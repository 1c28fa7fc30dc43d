//! Embed, retrieve, generate.

mod embedder;
mod error;
mod responder;
mod retriever;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use cinematch_llm::LlmProvider;
use cinematch_memory::VectorStore;
use tracing::Instrument as _;

pub use embedder::Embedder;
pub use error::{PipelineError, StageError};
pub use responder::Responder;
pub use retriever::{DEFAULT_MATCH_COUNT, DEFAULT_MATCH_THRESHOLD, RetrievalPolicy, Retriever};

use crate::transcript::Transcript;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Answers a query end to end. Object-safe so the HTTP layer can hold any
/// implementation behind an `Arc<dyn QueryService>`.
pub trait QueryService: Send + Sync {
    fn answer<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, PipelineError>>;
}

pub struct QueryPipeline<P> {
    embedder: Embedder<P>,
    retriever: Retriever,
    responder: Responder<P>,
    system_prompt: String,
}

impl<P: LlmProvider> QueryPipeline<P> {
    #[must_use]
    pub fn new(
        provider: Arc<P>,
        store: Box<dyn VectorStore>,
        policy: RetrievalPolicy,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            embedder: Embedder::new(Arc::clone(&provider)),
            retriever: Retriever::new(store, policy),
            responder: Responder::new(provider),
            system_prompt: system_prompt.into(),
        }
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run the three stages in order with a fresh transcript.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Failed`] if any stage fails; nothing partial is returned.
    pub async fn answer(&self, query: &str) -> Result<String, PipelineError> {
        let span = tracing::info_span!("pipeline", query_len = query.len());
        self.run(query)
            .instrument(span)
            .await
            .map_err(|e| {
                tracing::error!(retryable = e.is_retryable(), "pipeline failed: {e}");
                PipelineError::Failed(e)
            })
    }

    async fn run(&self, query: &str) -> Result<String, StageError> {
        tracing::info!("thinking");
        let embedding = self.embedder.embed(query).await?;
        let context = self.retriever.retrieve(embedding).await?;

        let mut transcript = Transcript::new(&self.system_prompt);
        let answer = self
            .responder
            .respond(&mut transcript, &context, query)
            .await?;

        tracing::info!(context_chars = context.len(), "response ready");
        Ok(answer)
    }
}

impl<P: LlmProvider> QueryService for QueryPipeline<P> {
    fn answer<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, PipelineError>> {
        Box::pin(QueryPipeline::answer(self, query))
    }
}
