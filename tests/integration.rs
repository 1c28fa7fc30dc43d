use std::sync::Arc;

use cinematch_core::config::DEFAULT_SYSTEM_PROMPT;
use cinematch_core::pipeline::RetrievalPolicy;
use cinematch_core::{QueryPipeline, StageError};
use cinematch_llm::openai::OpenAiProvider;
use cinematch_memory::SupabaseStore;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// -- Fixtures --

struct Services {
    openai: MockServer,
    supabase: MockServer,
}

impl Services {
    async fn start() -> Self {
        Self {
            openai: MockServer::start().await,
            supabase: MockServer::start().await,
        }
    }

    fn pipeline(&self) -> QueryPipeline<OpenAiProvider> {
        let client = reqwest::Client::new();
        let provider = OpenAiProvider::new(
            "sk-test".into(),
            self.openai.uri(),
            "gpt-4".into(),
            "text-embedding-ada-002".into(),
        )
        .with_client(client.clone())
        .with_temperature(0.65)
        .with_frequency_penalty(0.5);
        let store = SupabaseStore::new(client, self.supabase.uri(), "service-key".into());
        QueryPipeline::new(
            Arc::new(provider),
            Box::new(store),
            RetrievalPolicy::default(),
            DEFAULT_SYSTEM_PROMPT,
        )
    }

    async fn embeddings(&self, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(response)
            .expect(calls)
            .mount(&self.openai)
            .await;
    }

    async fn matches(&self, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/match_movies"))
            .respond_with(response)
            .expect(calls)
            .mount(&self.supabase)
            .await;
    }

    async fn completion(&self, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(response)
            .expect(calls)
            .mount(&self.openai)
            .await;
    }

    async fn bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

fn embedding_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": [{"embedding": [0.25, 0.5, 0.75]}]
    }))
}

fn rows(contents: &[&str]) -> ResponseTemplate {
    let rows: Vec<Value> = contents
        .iter()
        .enumerate()
        .map(|(i, c)| json!({"id": i, "content": c, "similarity": 0.9}))
        .collect();
    ResponseTemplate::new(200).set_body_json(Value::Array(rows))
}

fn completion_ok(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

// -- Pipeline contract --

#[tokio::test]
async fn three_matches_are_joined_in_order() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(rows(&["A", "B", "C"]), 1).await;
    s.completion(completion_ok("Go see B."), 1).await;

    let answer = s.pipeline().answer("which one?").await.unwrap();
    assert_eq!(answer, "Go see B.");

    let chat = Services::bodies(&s.openai, "/chat/completions").await;
    let messages = chat[0]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], DEFAULT_SYSTEM_PROMPT);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "Context: A\nB\nC Question: which one?");
}

#[tokio::test]
async fn wire_contracts_match_external_services() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(rows(&["A"]), 1).await;
    s.completion(completion_ok("ok"), 1).await;

    s.pipeline().answer("space westerns").await.unwrap();

    let embed = Services::bodies(&s.openai, "/embeddings").await;
    assert_eq!(
        embed[0],
        json!({"model": "text-embedding-ada-002", "input": "space westerns"})
    );

    let search = Services::bodies(&s.supabase, "/rest/v1/rpc/match_movies").await;
    assert_eq!(
        search[0],
        json!({"query_embedding": [0.25, 0.5, 0.75], "match_threshold": 0.5, "match_count": 3})
    );

    let chat = Services::bodies(&s.openai, "/chat/completions").await;
    assert_eq!(chat[0]["model"], "gpt-4");
    assert_eq!(chat[0]["temperature"], 0.65);
    assert_eq!(chat[0]["frequency_penalty"], 0.5);
}

#[tokio::test]
async fn zero_matches_still_complete_with_empty_context() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(rows(&[]), 1).await;
    s.completion(completion_ok("Sorry, I don't know the answer."), 1)
        .await;

    let answer = s.pipeline().answer("obscure film").await.unwrap();
    assert_eq!(answer, "Sorry, I don't know the answer.");

    let chat = Services::bodies(&s.openai, "/chat/completions").await;
    assert_eq!(
        chat[0]["messages"][1]["content"],
        "Context:  Question: obscure film"
    );
}

#[tokio::test]
async fn embedding_failure_makes_no_further_calls() {
    let s = Services::start().await;
    s.embeddings(ResponseTemplate::new(500), 1).await;
    s.matches(rows(&["A"]), 0).await;
    s.completion(completion_ok("unused"), 0).await;

    let err = s.pipeline().answer("q").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Sorry, something went wrong. Please try again."
    );
    assert!(matches!(err.stage(), StageError::EmbeddingService(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn missing_embedding_data_is_unavailable() {
    let s = Services::start().await;
    s.embeddings(
        ResponseTemplate::new(200).set_body_json(json!({"data": []})),
        1,
    )
    .await;
    s.matches(rows(&["A"]), 0).await;

    let err = s.pipeline().answer("q").await.unwrap_err();
    assert!(matches!(err.stage(), StageError::EmbeddingUnavailable));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn search_failure_skips_generation() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(
        ResponseTemplate::new(400).set_body_json(json!({"message": "bad dims"})),
        1,
    )
    .await;
    s.completion(completion_ok("unused"), 0).await;

    let err = s.pipeline().answer("q").await.unwrap_err();
    assert!(matches!(err.stage(), StageError::RetrievalService(_)));
}

#[tokio::test]
async fn generation_failure_hides_service_detail() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(rows(&["A"]), 1).await;
    s.completion(
        ResponseTemplate::new(503).set_body_string("upstream secret detail"),
        1,
    )
    .await;

    let err = s.pipeline().answer("q").await.unwrap_err();
    assert!(matches!(err.stage(), StageError::GenerationFailed));
    assert!(!format!("{err} {}", err.stage()).contains("secret"));
}

#[tokio::test]
async fn recommendation_is_returned_without_post_processing() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 1).await;
    s.matches(rows(&["A"]), 1).await;
    s.completion(completion_ok("\n**Alien** (1979)  \n"), 1).await;

    let answer = s.pipeline().answer("q").await.unwrap();
    assert_eq!(answer, "\n**Alien** (1979)  \n");
}

#[tokio::test]
async fn replay_is_idempotent_and_stateless() {
    let s = Services::start().await;
    s.embeddings(embedding_ok(), 3).await;
    s.matches(rows(&["A", "B"]), 3).await;
    s.completion(completion_ok("fixed"), 3).await;

    let pipeline = s.pipeline();
    for _ in 0..3 {
        assert_eq!(pipeline.answer("same").await.unwrap(), "fixed");
    }

    let chat = Services::bodies(&s.openai, "/chat/completions").await;
    assert_eq!(chat.len(), 3);
    for body in &chat {
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body, &chat[0]);
    }
}
