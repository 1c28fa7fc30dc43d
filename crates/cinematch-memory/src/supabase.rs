//! Similarity search through a Supabase (`PostgREST`) remote procedure.
//!
//! The procedure is expected to take `query_embedding`, `match_threshold` and
//! `match_count` and return rows carrying at least a `content` column.

use std::fmt;

use serde::Serialize;

use crate::vector_store::{
    BoxFuture, MatchQuery, MatchedDocument, VectorStore, VectorStoreError,
};

pub const DEFAULT_MATCH_FUNCTION: &str = "match_movies";

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    function: String,
}

impl fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .field("function", &self.function)
            .finish()
    }
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(client: reqwest::Client, mut base_url: String, service_key: String) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            service_key,
            function: DEFAULT_MATCH_FUNCTION.to_owned(),
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, self.function)
    }

    async fn call_match(&self, query: MatchQuery) -> Result<Vec<MatchedDocument>, VectorStoreError> {
        let body = MatchRequest {
            query_embedding: &query.embedding,
            match_threshold: query.threshold,
            match_count: query.count,
        };

        let response = self
            .client
            .post(self.rpc_url())
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::Connection(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| VectorStoreError::Connection(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(
                function = %self.function,
                "Supabase RPC error {status}: {}",
                String::from_utf8_lossy(&bytes)
            );
            return Err(VectorStoreError::Status {
                status: status.as_u16(),
            });
        }

        let rows: Vec<MatchedDocument> = serde_json::from_slice(&bytes)
            .map_err(|e| VectorStoreError::Serialization(e.to_string()))?;
        tracing::debug!(function = %self.function, rows = rows.len(), "Supabase RPC matched");
        Ok(rows)
    }
}

impl VectorStore for SupabaseStore {
    fn match_documents(
        &self,
        query: MatchQuery,
    ) -> BoxFuture<'_, Result<Vec<MatchedDocument>, VectorStoreError>> {
        Box::pin(self.call_match(query))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "supabase"
    }
}
