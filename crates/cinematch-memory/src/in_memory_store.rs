use std::sync::RwLock;

use crate::vector_store::{
    BoxFuture, MatchQuery, MatchedDocument, VectorStore, VectorStoreError,
};

struct StoredDocument {
    id: serde_json::Value,
    content: String,
    vector: Vec<f32>,
}

/// Brute-force cosine-similarity index held in process memory.
pub struct InMemoryVectorStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Add a document. Insertion order breaks similarity ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty, its dimension differs from the
    /// documents already stored, or the lock is poisoned.
    pub fn insert(
        &self,
        id: impl Into<serde_json::Value>,
        content: impl Into<String>,
        vector: Vec<f32>,
    ) -> Result<(), VectorStoreError> {
        if vector.is_empty() {
            return Err(VectorStoreError::Search("empty vector".into()));
        }
        let mut docs = self
            .documents
            .write()
            .map_err(|e| VectorStoreError::Search(format!("lock poisoned: {e}")))?;
        if let Some(first) = docs.first()
            && first.vector.len() != vector.len()
        {
            return Err(VectorStoreError::Search(format!(
                "different vector dimensions {} and {}",
                first.vector.len(),
                vector.len()
            )));
        }
        docs.push(StoredDocument {
            id: id.into(),
            content: content.into(),
            vector,
        });
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().map_or(0, |d| d.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn search(&self, query: &MatchQuery) -> Result<Vec<MatchedDocument>, VectorStoreError> {
        let docs = self
            .documents
            .read()
            .map_err(|e| VectorStoreError::Search(format!("lock poisoned: {e}")))?;

        if let Some(first) = docs.first()
            && first.vector.len() != query.embedding.len()
        {
            return Err(VectorStoreError::Search(format!(
                "different vector dimensions {} and {}",
                first.vector.len(),
                query.embedding.len()
            )));
        }

        let mut scored: Vec<(f32, &StoredDocument)> = docs
            .iter()
            .map(|d| (cosine_similarity(&query.embedding, &d.vector), d))
            .filter(|(score, _)| *score >= query.threshold)
            .collect();
        // stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(query.count);

        Ok(scored
            .into_iter()
            .map(|(score, d)| MatchedDocument {
                content: d.content.clone(),
                similarity: Some(score),
                id: Some(d.id.clone()),
            })
            .collect())
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .field("documents", &self.len())
            .finish()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for InMemoryVectorStore {
    fn match_documents(
        &self,
        query: MatchQuery,
    ) -> BoxFuture<'_, Result<Vec<MatchedDocument>, VectorStoreError>> {
        let result = self.search(&query);
        Box::pin(std::future::ready(result))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "in-memory"
    }
}
