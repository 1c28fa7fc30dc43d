use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("search error: {0}")]
    Search(String),
    #[error("search request failed with status {status}")]
    Status { status: u16 },
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl VectorStoreError {
    /// Connection failures and server-side errors may succeed on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Status { status } => *status >= 500 || *status == 429,
            Self::Search(_) | Self::Serialization(_) => false,
        }
    }
}

/// Parameters of one similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub embedding: Vec<f32>,
    pub threshold: f32,
    pub count: usize,
}

/// A stored document returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedDocument {
    pub content: String,
    #[serde(default)]
    pub similarity: Option<f32>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl MatchedDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            similarity: None,
            id: None,
        }
    }
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait VectorStore: Send + Sync {
    /// Return at most `query.count` documents with similarity at or above
    /// `query.threshold`, in the order the backend ranks them.
    fn match_documents(
        &self,
        query: MatchQuery,
    ) -> BoxFuture<'_, Result<Vec<MatchedDocument>, VectorStoreError>>;

    fn name(&self) -> &str;
}
