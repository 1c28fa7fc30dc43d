use serde::{Deserialize, Serialize};

use crate::vault::Secret;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an enthusiastic movie expert who loves recommending movies to people. \
You will be given two pieces of information - some context about movies and a question. \
Your main job is to formulate a short answer to the question using the provided context. \
If you are unsure, say \"Sorry, I don't know the answer.\" Do not make up answers.";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_llm_model() -> String {
    "gpt-4".into()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

fn default_temperature() -> f32 {
    0.65
}

fn default_frequency_penalty() -> f32 {
    0.5
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            frequency_penalty: default_frequency_penalty(),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Supabase project URL; usually supplied through `SUPABASE_URL`.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_match_function")]
    pub function: String,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    #[serde(default = "default_match_count")]
    pub match_count: usize,
}

fn default_match_function() -> String {
    cinematch_memory::supabase::DEFAULT_MATCH_FUNCTION.into()
}

fn default_match_threshold() -> f32 {
    crate::pipeline::DEFAULT_MATCH_THRESHOLD
}

fn default_match_count() -> usize {
    crate::pipeline::DEFAULT_MATCH_COUNT
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            function: default_match_function(),
            match_threshold: default_match_threshold(),
            match_count: default_match_count(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    #[serde(default = "default_gateway_path")]
    pub path: String,
    #[serde(default = "default_gateway_max_body")]
    pub max_body_size: usize,
}

fn default_gateway_bind() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_path() -> String {
    "/api/match".into()
}

fn default_gateway_max_body() -> usize {
    1_048_576
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_gateway_bind(),
            port: default_gateway_port(),
            path: default_gateway_path(),
            max_body_size: default_gateway_max_body(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_seconds: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_seconds: default_connect_timeout(),
            request_seconds: default_request_timeout(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
    pub supabase_service_key: Option<Secret>,
}
