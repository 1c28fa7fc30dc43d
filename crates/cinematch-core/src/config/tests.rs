use std::io::Write;

use serial_test::serial;

use super::*;
use crate::vault::{Credential, FixedVault};

const ENV_KEYS: [&str; 13] = [
    "CINEMATCH_LLM_BASE_URL",
    "CINEMATCH_LLM_MODEL",
    "CINEMATCH_LLM_EMBEDDING_MODEL",
    "CINEMATCH_LLM_TEMPERATURE",
    "CINEMATCH_LLM_FREQUENCY_PENALTY",
    "SUPABASE_URL",
    "CINEMATCH_RETRIEVAL_FUNCTION",
    "CINEMATCH_RETRIEVAL_MATCH_THRESHOLD",
    "CINEMATCH_RETRIEVAL_MATCH_COUNT",
    "CINEMATCH_GATEWAY_BIND",
    "CINEMATCH_GATEWAY_PORT",
    "CINEMATCH_TIMEOUT_CONNECT",
    "CINEMATCH_TIMEOUT_REQUEST",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
fn defaults_match_reference_behavior() {
    let config = Config::default();
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.model, "gpt-4");
    assert_eq!(config.llm.embedding_model, "text-embedding-ada-002");
    assert!((config.llm.temperature - 0.65).abs() < f32::EPSILON);
    assert!((config.llm.frequency_penalty - 0.5).abs() < f32::EPSILON);
    assert!(config.llm.max_tokens.is_none());
    assert_eq!(config.retrieval.function, "match_movies");
    assert!((config.retrieval.match_threshold - 0.5).abs() < f32::EPSILON);
    assert_eq!(config.retrieval.match_count, 3);
    assert!(config.agent.system_prompt.contains("movie expert"));
    assert_eq!(config.gateway.path, "/api/match");
    assert_eq!(config.gateway.port, 3000);
    assert!(config.secrets.openai_api_key.is_none());
}

#[test]
#[serial]
fn missing_file_yields_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.llm.model, "gpt-4");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn parse_valid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    write!(
        f,
        r#"
[llm]
model = "gpt-4o-mini"
temperature = 0.2
max_tokens = 300

[retrieval]
url = "https://proj.supabase.co"
function = "match_documents"
match_count = 5

[agent]
system_prompt = "You recommend books."

[gateway]
port = 8080
"#
    )
    .unwrap();

    clear_env();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.embedding_model, "text-embedding-ada-002");
    assert_eq!(config.llm.max_tokens, Some(300));
    assert_eq!(config.retrieval.url, "https://proj.supabase.co");
    assert_eq!(config.retrieval.function, "match_documents");
    assert_eq!(config.retrieval.match_count, 5);
    assert_eq!(config.agent.system_prompt, "You recommend books.");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.bind, "127.0.0.1");
}

#[test]
#[serial]
fn invalid_toml_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[llm\nmodel = ").unwrap();
    clear_env();
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config file"));
}

#[test]
#[serial]
fn env_overrides() {
    clear_env();
    let mut config = Config::default();

    unsafe {
        std::env::set_var("CINEMATCH_LLM_MODEL", "gpt-4-turbo");
        std::env::set_var("SUPABASE_URL", "https://env.supabase.co");
        std::env::set_var("CINEMATCH_RETRIEVAL_MATCH_COUNT", "7");
        std::env::set_var("CINEMATCH_GATEWAY_PORT", "9000");
    }
    config.apply_env_overrides();
    clear_env();

    assert_eq!(config.llm.model, "gpt-4-turbo");
    assert_eq!(config.retrieval.url, "https://env.supabase.co");
    assert_eq!(config.retrieval.match_count, 7);
    assert_eq!(config.gateway.port, 9000);
}

#[test]
#[serial]
fn invalid_env_values_are_ignored() {
    clear_env();
    let mut config = Config::default();

    unsafe {
        std::env::set_var("CINEMATCH_LLM_TEMPERATURE", "warm");
        std::env::set_var("CINEMATCH_RETRIEVAL_MATCH_COUNT", "-1");
        std::env::set_var("CINEMATCH_GATEWAY_PORT", "99999");
    }
    config.apply_env_overrides();
    clear_env();

    assert!((config.llm.temperature - 0.65).abs() < f32::EPSILON);
    assert_eq!(config.retrieval.match_count, 3);
    assert_eq!(config.gateway.port, 3000);
}

#[test]
fn validate_rejects_zero_match_count() {
    let mut config = Config::default();
    config.retrieval.match_count = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("match_count"));
}

#[test]
fn validate_rejects_out_of_range_sampling() {
    let mut config = Config::default();
    config.llm.temperature = 3.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.llm.frequency_penalty = -2.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.retrieval.match_threshold = f32::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_relative_gateway_path() {
    let mut config = Config::default();
    config.gateway.path = "api/match".into();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("gateway.path"));

    config.gateway.path = "/health".into();
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn shipped_default_config_is_valid() {
    clear_env();
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml");
    let config = Config::load(&path).unwrap();
    assert_eq!(config.llm.model, "gpt-4");
    assert_eq!(config.retrieval.match_count, 3);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn resolve_secrets_populates_credentials() {
    let vault = FixedVault::default()
        .with(Credential::OpenAiApiKey, "sk-vault")
        .with(Credential::SupabaseServiceRoleKey, "service-vault");
    let mut config = Config::default();
    config.resolve_secrets(&vault).await.unwrap();
    assert_eq!(
        config.secrets.openai_api_key.as_ref().map(|s| s.expose()),
        Some("sk-vault")
    );
    assert_eq!(
        config.secrets.supabase_service_key.as_ref().map(|s| s.expose()),
        Some("service-vault")
    );
}

#[tokio::test]
async fn resolve_secrets_leaves_missing_unset() {
    let vault = FixedVault::default().with(Credential::OpenAiApiKey, "sk-vault");
    let mut config = Config::default();
    config.resolve_secrets(&vault).await.unwrap();
    assert!(config.secrets.get(Credential::OpenAiApiKey).is_some());
    assert!(config.secrets.supabase_service_key.is_none());
    let err = config
        .secrets
        .require(Credential::SupabaseServiceRoleKey)
        .unwrap_err();
    assert_eq!(err.to_string(), "SUPABASE_SERVICE_ROLE_KEY is not set");
}
