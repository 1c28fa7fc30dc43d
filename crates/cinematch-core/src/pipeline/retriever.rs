use cinematch_memory::{MatchQuery, VectorStore};

use super::error::StageError;

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MATCH_COUNT: usize = 3;

/// Search parameters passed through to the vector store unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalPolicy {
    pub threshold: f32,
    pub count: usize,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            count: DEFAULT_MATCH_COUNT,
        }
    }
}

pub struct Retriever {
    store: Box<dyn VectorStore>,
    policy: RetrievalPolicy,
}

impl Retriever {
    #[must_use]
    pub fn new(store: Box<dyn VectorStore>, policy: RetrievalPolicy) -> Self {
        Self { store, policy }
    }

    /// Fetch matching documents and join their text with newlines, in the
    /// order the store returned them. No matches yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::RetrievalService`] if the search call fails.
    pub async fn retrieve(&self, embedding: Vec<f32>) -> Result<String, StageError> {
        let query = MatchQuery {
            embedding,
            threshold: self.policy.threshold,
            count: self.policy.count,
        };

        let rows = self.store.match_documents(query).await.map_err(|e| {
            tracing::error!(store = self.store.name(), "similarity search failed: {e}");
            StageError::RetrievalService(e)
        })?;

        tracing::debug!(store = self.store.name(), matches = rows.len(), "context retrieved");
        Ok(join_context(rows.iter().map(|r| r.content.as_str())))
    }
}

fn join_context<'a>(contents: impl Iterator<Item = &'a str>) -> String {
    contents.collect::<Vec<_>>().join("\n")
}
