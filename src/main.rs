use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use cinematch_core::config::Config;
use cinematch_core::pipeline::RetrievalPolicy;
use cinematch_core::vault::{Credential, EnvVaultProvider};
use cinematch_core::{QueryPipeline, QueryService};
use cinematch_gateway::GatewayServer;
use cinematch_llm::http::default_client;
use cinematch_llm::openai::OpenAiProvider;
use cinematch_memory::SupabaseStore;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let config_path = resolve_config_path();
    let mut config = Config::load(&config_path)?;
    config.validate()?;
    config.resolve_secrets(&EnvVaultProvider).await?;

    let pipeline = build_pipeline(&config)?;

    if let Some(query) = flag_value("--query") {
        let answer = pipeline.answer(&query).await?;
        println!("{answer}");
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let service: Arc<dyn QueryService> = Arc::new(pipeline);
    GatewayServer::new(
        &config.gateway.bind,
        config.gateway.port,
        service,
        shutdown_rx,
    )
    .with_path(config.gateway.path.clone())
    .with_max_body_size(config.gateway.max_body_size)
    .serve()
    .await?;

    Ok(())
}

/// Construct the external client handles once and wire them into the pipeline.
fn build_pipeline(config: &Config) -> anyhow::Result<QueryPipeline<OpenAiProvider>> {
    let openai_key = config.secrets.require(Credential::OpenAiApiKey)?;
    let supabase_key = config.secrets.require(Credential::SupabaseServiceRoleKey)?;
    if config.retrieval.url.is_empty() {
        bail!("SUPABASE_URL is not set and retrieval.url is empty");
    }

    let client = default_client(
        Duration::from_secs(config.timeouts.connect_seconds),
        Duration::from_secs(config.timeouts.request_seconds),
    );

    let mut provider = OpenAiProvider::new(
        openai_key.expose().to_owned(),
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.embedding_model.clone(),
    )
    .with_client(client.clone())
    .with_temperature(config.llm.temperature)
    .with_frequency_penalty(config.llm.frequency_penalty);
    if let Some(max_tokens) = config.llm.max_tokens {
        provider = provider.with_max_tokens(max_tokens);
    }

    let store = SupabaseStore::new(
        client,
        config.retrieval.url.clone(),
        supabase_key.expose().to_owned(),
    )
    .with_function(config.retrieval.function.clone());

    tracing::info!(
        model = %config.llm.model,
        embedding_model = %config.llm.embedding_model,
        function = %config.retrieval.function,
        match_threshold = config.retrieval.match_threshold,
        match_count = config.retrieval.match_count,
        "pipeline configured"
    );

    Ok(QueryPipeline::new(
        Arc::new(provider),
        Box::new(store),
        RetrievalPolicy {
            threshold: config.retrieval.match_threshold,
            count: config.retrieval.match_count,
        },
        config.agent.system_prompt.clone(),
    ))
}

fn flag_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn resolve_config_path() -> PathBuf {
    if let Some(path) = flag_value("--config") {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("CINEMATCH_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
